use anyhow::Result;
use pic_tiles::{run, Config};

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("PIC_LOG", "info")
        .write_style_or("PIC_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let cfg = Config::new()?;
    run(cfg)
}
