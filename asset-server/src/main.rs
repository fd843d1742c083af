use asset_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        database = %config.database_path,
        "Asset server starting"
    );

    // 4. 数据库 + 服务
    let state = match ServerState::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    // 5. HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
