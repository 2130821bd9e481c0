//! 种子题库 - 固定题目集合
//!
//! 进程启动时从内置集合或 TOML 种子文件加载，运行期间只追加不修改。
//! 题目列表由互斥锁守护，避免并发追加时 ID 重复或丢失。

use std::path::Path;
use std::sync::Mutex;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Question, QuestionContent, QuestionDraft, QuestionType};

/// 种子题库
pub struct SeedBank {
    questions: Mutex<Vec<Question>>,
}

/// 种子文件结构
#[derive(Debug, Deserialize)]
struct SeedFile {
    questions: Vec<QuestionDraft>,
}

impl SeedBank {
    /// 使用内置题目集合创建题库
    pub fn builtin() -> Self {
        Self::from_drafts(builtin_questions())
    }

    /// 从题目草稿列表创建题库，按顺序分配 ID（从 1 开始）
    pub fn from_drafts(drafts: Vec<QuestionDraft>) -> Self {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| draft.into_question(index as u64 + 1))
            .collect();
        Self {
            questions: Mutex::new(questions),
        }
    }

    /// 从 TOML 种子文件加载题库
    ///
    /// 不合法的记录跳过并记日志；全部无效时按输入错误处理。
    pub async fn load_from_toml(path: &Path) -> AppResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::invalid_input(format!("无法读取种子文件 {}: {}", path.display(), e))
        })?;

        let seed_file: SeedFile = toml::from_str(&content).map_err(|e| {
            AppError::invalid_input(format!("无法解析种子文件 {}: {}", path.display(), e))
        })?;

        let total = seed_file.questions.len();
        let valid: Vec<QuestionDraft> = seed_file
            .questions
            .into_iter()
            .filter(|draft| match draft.content.validate() {
                Ok(()) => true,
                Err(reason) => {
                    warn!("跳过不合法的种子题目 ({}): {}", reason, draft.stem);
                    false
                }
            })
            .collect();

        if valid.is_empty() {
            return Err(AppError::invalid_input(format!(
                "种子文件 {} 中没有合法题目",
                path.display()
            )));
        }

        info!("种子文件加载完成: {}/{} 题有效", valid.len(), total);
        Ok(Self::from_drafts(valid))
    }

    /// 随机取一道题
    pub fn get_random_question(&self, types: Option<&[QuestionType]>) -> Option<Question> {
        let questions = self.questions.lock().unwrap();
        let pool: Vec<&Question> = filter_by_types(&questions, types);
        pool.choose(&mut rand::thread_rng()).map(|q| (*q).clone())
    }

    /// 按 ID 查找题目（线性查找）
    pub fn get_question_by_id(&self, id: u64) -> Option<Question> {
        let questions = self.questions.lock().unwrap();
        questions.iter().find(|q| q.id == id).cloned()
    }

    /// 随机取 `num` 道互不相同的题目
    ///
    /// 数量超过可用题目时返回全部（顺序不保证），否则无放回均匀抽样。
    pub fn get_random_questions(
        &self,
        num: usize,
        types: Option<&[QuestionType]>,
    ) -> Vec<Question> {
        let questions = self.questions.lock().unwrap();
        let pool: Vec<&Question> = filter_by_types(&questions, types);

        if num >= pool.len() {
            return pool.into_iter().cloned().collect();
        }

        pool.choose_multiple(&mut rand::thread_rng(), num)
            .map(|q| (*q).clone())
            .collect()
    }

    /// 追加题目，分配 `max(现有 ID, 0) + 1` 作为新 ID
    pub fn add_question(&self, draft: QuestionDraft) -> Question {
        let mut questions = self.questions.lock().unwrap();
        let next_id = questions.iter().map(|q| q.id).max().unwrap_or(0) + 1;
        let question = draft.into_question(next_id);
        questions.push(question.clone());
        question
    }

    /// 当前题目数量
    pub fn len(&self) -> usize {
        self.questions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn filter_by_types<'a>(
    questions: &'a [Question],
    types: Option<&[QuestionType]>,
) -> Vec<&'a Question> {
    match types {
        Some(list) if !list.is_empty() => questions
            .iter()
            .filter(|q| {
                q.content
                    .question_type()
                    .map(|qt| list.contains(&qt))
                    .unwrap_or(false)
            })
            .collect(),
        _ => questions.iter().collect(),
    }
}

/// 内置种子题目（覆盖全部三种题型）
fn builtin_questions() -> Vec<QuestionDraft> {
    fn fill_blank(stem: &str, answer: &str) -> QuestionDraft {
        QuestionDraft {
            stem: stem.to_string(),
            content: QuestionContent::FillBlank {
                answer: answer.to_string(),
            },
        }
    }

    fn multiple_choice(stem: &str, options: &[&str], answer: &str) -> QuestionDraft {
        QuestionDraft {
            stem: stem.to_string(),
            content: QuestionContent::MultipleChoice {
                options: options.iter().map(|s| s.to_string()).collect(),
                answer: answer.to_string(),
            },
        }
    }

    fn rearrangement(stem: &str, options: &[&str], answer: &[&str]) -> QuestionDraft {
        QuestionDraft {
            stem: stem.to_string(),
            content: QuestionContent::SentenceRearrangement {
                options: options.iter().map(|s| s.to_string()).collect(),
                answer: answer.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    vec![
        fill_blank("The capital of Vietnam is ___.", "Hanoi"),
        fill_blank("Water boils at ___ degrees Celsius at sea level.", "100"),
        fill_blank("She ___ to school by bus every day.", "goes"),
        fill_blank("The largest planet in the solar system is ___.", "Jupiter"),
        multiple_choice(
            "Which city is the capital of Vietnam?",
            &["Hanoi", "Da Nang", "Ho Chi Minh City", "Hue"],
            "Hanoi",
        ),
        multiple_choice(
            "Which word is a verb?",
            &["quickly", "run", "blue", "happiness"],
            "run",
        ),
        multiple_choice(
            "What is the past tense of \"go\"?",
            &["goed", "gone", "went", "going"],
            "went",
        ),
        multiple_choice(
            "Which ocean is the largest?",
            &["Atlantic", "Indian", "Arctic", "Pacific"],
            "Pacific",
        ),
        rearrangement(
            "Arrange the words to form a correct sentence.",
            &["studying", "I", "am"],
            &["I", "am", "studying"],
        ),
        rearrangement(
            "Arrange the words to form a correct sentence.",
            &["books", "likes", "She", "reading"],
            &["She", "likes", "reading", "books"],
        ),
        rearrangement(
            "Arrange the words to form a correct sentence.",
            &["market", "We", "to", "went", "the"],
            &["We", "went", "to", "the", "market"],
        ),
        rearrangement(
            "Arrange the words to form a correct sentence.",
            &["football", "He", "weekend", "plays", "every"],
            &["He", "plays", "football", "every", "weekend"],
        ),
    ]
}
