use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider integration identifier as stored on a channel.
///
/// Any integer is a legal value; identifiers without a schema entry resolve
/// to the generic field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelType(pub i64);

impl ChannelType {
    pub const OPENAI: Self = Self(1);
    pub const AZURE: Self = Self(3);
    pub const CUSTOM: Self = Self(8);
    pub const PALM: Self = Self(11);
    pub const ANTHROPIC: Self = Self(14);
    pub const BAIDU: Self = Self(15);
    pub const ZHIPU: Self = Self(16);
    pub const ALI: Self = Self(17);
    pub const XUNFEI: Self = Self(18);
    pub const TENCENT: Self = Self(23);
    pub const GEMINI: Self = Self(25);
    pub const MINIMAX: Self = Self(27);
    pub const DEEPSEEK: Self = Self(28);
    pub const MOONSHOT: Self = Self(29);
    pub const GROQ: Self = Self(31);
    pub const BEDROCK: Self = Self(32);
    pub const CLOUDFLARE: Self = Self(35);
    pub const OLLAMA: Self = Self(39);
    pub const VERTEX_AI: Self = Self(42);

    pub const BUILTIN: &'static [Self] = &[
        Self::OPENAI,
        Self::AZURE,
        Self::CUSTOM,
        Self::PALM,
        Self::ANTHROPIC,
        Self::BAIDU,
        Self::ZHIPU,
        Self::ALI,
        Self::XUNFEI,
        Self::TENCENT,
        Self::GEMINI,
        Self::MINIMAX,
        Self::DEEPSEEK,
        Self::MOONSHOT,
        Self::GROQ,
        Self::BEDROCK,
        Self::CLOUDFLARE,
        Self::OLLAMA,
        Self::VERTEX_AI,
    ];

    pub fn display_name(&self) -> Option<&'static str> {
        match *self {
            Self::OPENAI => Some("OpenAI"),
            Self::AZURE => Some("Azure OpenAI"),
            Self::CUSTOM => Some("Custom"),
            Self::PALM => Some("Google PaLM2"),
            Self::ANTHROPIC => Some("Anthropic Claude"),
            Self::BAIDU => Some("Baidu Wenxin"),
            Self::ZHIPU => Some("Zhipu"),
            Self::ALI => Some("Alibaba Qwen"),
            Self::XUNFEI => Some("iFlytek Spark"),
            Self::TENCENT => Some("Tencent Hunyuan"),
            Self::GEMINI => Some("Google Gemini"),
            Self::MINIMAX => Some("MiniMax"),
            Self::DEEPSEEK => Some("Deepseek"),
            Self::MOONSHOT => Some("Moonshot"),
            Self::GROQ => Some("Groq"),
            Self::BEDROCK => Some("Amazon Bedrock"),
            Self::CLOUDFLARE => Some("Cloudflare AI"),
            Self::OLLAMA => Some("Ollama"),
            Self::VERTEX_AI => Some("Vertex AI"),
            _ => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        Self::BUILTIN.contains(self)
    }
}

impl Default for ChannelType {
    fn default() -> Self {
        Self::OPENAI
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "type {}", self.0),
        }
    }
}

impl From<i64> for ChannelType {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
