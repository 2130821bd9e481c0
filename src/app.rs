//! 应用组装与启动
//!
//! `App::initialize` 负责把客户端、服务、题库装配成路由，
//! `App::run` 绑定监听地址并启动 HTTP 服务。

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing::info;

use crate::api::{self, AppState};
use crate::clients::{LlmClient, PdfExtractor, TextExtractor, TextGenerator};
use crate::config::{Config, QuestionSource};
use crate::services::{ExplainService, GenerateService, IngestService};
use crate::store::{LlmBank, QuestionBank, SeedBank};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let generator: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(&config));
        let extractor: Arc<dyn TextExtractor> = Arc::new(PdfExtractor::new());
        let generate = GenerateService::new(Arc::clone(&generator));

        let bank = match config.question_source {
            QuestionSource::Seed => {
                let bank = if config.seed_file.is_empty() {
                    SeedBank::builtin()
                } else {
                    SeedBank::load_from_toml(Path::new(&config.seed_file)).await?
                };
                info!("📚 题库模式: 种子题库 ({} 题)", bank.len());
                QuestionBank::Seed(bank)
            }
            QuestionSource::Llm => {
                info!("📚 题库模式: LLM 动态生成");
                QuestionBank::Llm(LlmBank::new(generate.clone()))
            }
        };

        let state = AppState {
            bank: Arc::new(bank),
            explain: Arc::new(ExplainService::new(Arc::clone(&generator))),
            ingest: Arc::new(IngestService::new(extractor, generate, &config)),
        };

        let router = api::create_router(state);

        Ok(Self { config, router })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<()> {
        logging::log_startup(&self.config);

        let listener = tokio::net::TcpListener::bind(&self.config.listen_addr).await?;
        info!("✓ 服务已就绪: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
