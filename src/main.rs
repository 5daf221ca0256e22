use anyhow::Context;
use dual_chain_client::config::Config;
use dual_chain_client::log_info;
use dual_chain_client::startup::Application;
use dual_chain_client::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选
    let _ = dotenvy::dotenv();

    // 1. 加载配置（日志参数也在其中）
    let config = Config::load().context("Failed to load application configuration")?;

    // 初始化日志（全局只需调用一次）
    init_logger(&config.log);

    log_info!("Starting application initialization...");

    // 2. 构建应用实例（解析私钥、建立 L1/L2 连接）
    let application =
        Application::build(config).context("Application building failed (chain client initialization)")?;

    log_info!("Application build complete.");

    // 3. 运行
    application
        .run()
        .await
        .context("Application core service failed during runtime")?;

    Ok(())
}
