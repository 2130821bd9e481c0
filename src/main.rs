use anyhow::Result;
use quiz_exam_server::utils::logging;
use quiz_exam_server::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行服务
    App::initialize(config).await?.run().await?;

    Ok(())
}
