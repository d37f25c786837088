//! Local responder: the deterministic fallback brain.
//!
//! Maps raw user text to a canned `(reply, emotion, action)` triple through
//! keyword rules. It has no external dependencies and always succeeds, so
//! it backs every path where the remote model is missing, slow, or broken.
//!
//! ## Priority
//!
//! Keyword sets overlap ("再见?" is both a farewell and a question), so
//! intents are tested in a fixed order and the first match wins:
//!
//! ```text
//! Greeting → SelfIntroduction → Gratitude → Farewell → Weather → Dance → Question → Fallback
//! ```
//!
//! Within an intent, one of its canned replies is picked uniformly at random
//! from an injected, seedable RNG.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::types::{Action, Emotion, ReplyResult};

/// A canned reply: `(text, emotion, action)`.
pub type CannedReply = (&'static str, Emotion, Action);

/// Keyword category recognized in user text, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Hello / good morning.
    Greeting,
    /// "Who are you?" / "introduce yourself".
    SelfIntroduction,
    /// Thanks.
    Gratitude,
    /// Goodbye.
    Farewell,
    /// Weather talk.
    Weather,
    /// A request to dance.
    Dance,
    /// Anything phrased as a question.
    Question,
    /// Nothing matched.
    Fallback,
}

impl Intent {
    /// Every intent, in matching priority order.
    pub const PRIORITY: [Intent; 8] = [
        Self::Greeting,
        Self::SelfIntroduction,
        Self::Gratitude,
        Self::Farewell,
        Self::Weather,
        Self::Dance,
        Self::Question,
        Self::Fallback,
    ];

    /// Keywords that select this intent. Matching is a case-insensitive
    /// substring test; `Fallback` has none.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &["你好", "您好", "hello", "hi", "嗨", "早上好", "下午好", "晚上好"],
            Self::SelfIntroduction => &["你是谁", "介绍", "什么"],
            Self::Gratitude => &["谢谢", "感谢"],
            Self::Farewell => &["再见", "拜拜", "bye"],
            Self::Weather => &["天气"],
            Self::Dance => &["跳舞", "舞"],
            Self::Question => &["?", "？", "吗"],
            Self::Fallback => &[],
        }
    }

    /// The canned replies for this intent. Never empty.
    #[must_use]
    pub fn replies(self) -> &'static [CannedReply] {
        match self {
            Self::Greeting => &[
                ("您好！很高兴见到您，有什么可以帮助您的吗？", Emotion::Happy, Action::Wave),
                ("你好呀！今天心情怎么样？", Emotion::Happy, Action::Greet),
                ("嗨！欢迎来到数字人交互系统！", Emotion::Happy, Action::Wave),
            ],
            Self::SelfIntroduction => &[(
                "我是一个数字人助手，可以和您进行对话交流，展示各种表情和动作。您可以问我问题，或者让我做一些动作！",
                Emotion::Happy,
                Action::Greet,
            )],
            Self::Gratitude => &[(
                "不客气！能帮到您我很开心。还有其他需要帮助的吗？",
                Emotion::Happy,
                Action::Nod,
            )],
            Self::Farewell => &[("再见！期待下次与您交流！", Emotion::Happy, Action::Wave)],
            Self::Weather => &[(
                "今天天气看起来不错呢！适合出去走走。不过我是数字人，没办法真正感受天气，哈哈。",
                Emotion::Happy,
                Action::Think,
            )],
            Self::Dance => &[("好的，让我来给您跳一段舞！", Emotion::Happy, Action::Dance)],
            Self::Question => &[(
                "这是个好问题！让我想想... 作为数字人助手，我会尽力帮助您。您能说得更具体一些吗？",
                Emotion::Neutral,
                Action::Think,
            )],
            Self::Fallback => &[
                ("我明白了，请继续说。", Emotion::Neutral, Action::Nod),
                ("好的，我在听。", Emotion::Neutral, Action::Idle),
                ("嗯嗯，有什么我可以帮助您的吗？", Emotion::Neutral, Action::Nod),
                ("了解了，还有其他想说的吗？", Emotion::Neutral, Action::Idle),
            ],
        }
    }

    /// Classify user text into the first matching intent.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|intent| intent.keywords().iter().any(|kw| lower.contains(kw)))
            .unwrap_or(Self::Fallback)
    }
}

/// Keyword-rule responder with an injectable random source.
///
/// Safe to share across concurrent turns; the RNG sits behind a mutex held
/// only for the duration of one pick.
#[derive(Debug)]
pub struct LocalResponder {
    rng: Mutex<StdRng>,
}

impl LocalResponder {
    /// Create a responder seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a responder with a fixed seed, for reproducible output.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a responder around an existing RNG.
    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Produce a reply for `text`. Total: never fails.
    #[must_use]
    pub fn respond(&self, text: &str) -> ReplyResult {
        let intent = Intent::classify(text);
        let replies = intent.replies();
        let (reply, emotion, action) = {
            let mut rng = self.rng.lock();
            replies.choose(&mut *rng).copied().unwrap_or(replies[0])
        };
        tracing::debug!(?intent, %emotion, %action, "Local responder picked reply");
        ReplyResult::new(reply, emotion, action)
    }
}

impl Default for LocalResponder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
