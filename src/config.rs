/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 监听地址
    pub listen_addr: String,
    /// 题库来源（内置题库 / LLM 动态生成）
    pub question_source: QuestionSource,
    /// 种子题库 TOML 文件路径（为空则使用内置题库）
    pub seed_file: String,
    /// 每份上传文档生成的题目数量
    pub ingest_num_questions: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 每次 LLM 调用的超时时间（秒）
    pub llm_timeout_secs: u64,
}

/// 题库来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionSource {
    /// 固定种子题库
    Seed,
    /// 每次请求调用 LLM 生成
    Llm,
}

impl QuestionSource {
    /// 从配置值解析题库来源
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "seed" => Some(QuestionSource::Seed),
            "llm" => Some(QuestionSource::Llm),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            question_source: QuestionSource::Seed,
            seed_file: String::new(),
            ingest_num_questions: 5,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(default.listen_addr),
            question_source: std::env::var("QUESTION_SOURCE").ok().and_then(|v| QuestionSource::from_value(&v)).unwrap_or(default.question_source),
            seed_file: std::env::var("SEED_FILE").unwrap_or(default.seed_file),
            ingest_num_questions: std::env::var("INGEST_NUM_QUESTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.ingest_num_questions),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
        }
    }
}
