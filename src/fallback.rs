//! Local replies used when the backend cannot be reached.

use rand::Rng;
use rand::seq::SliceRandom;

pub const OFFLINE_DISCLAIMER: &str = "\n\n⚠️ (Backend bağlantısı yok - lokal mod)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackRule {
    pub patterns: &'static [&'static str],
    pub response: &'static str,
}

impl FallbackRule {
    fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|pattern| lowered.contains(pattern))
    }
}

/// First matching rule wins.
const DEFAULT_RULES: &[FallbackRule] = &[
    FallbackRule {
        patterns: &["kaçta", "saat"],
        response: "Daha önce 16:00'da dışarı çıkacağınızı söylemiştiniz.",
    },
    FallbackRule {
        patterns: &["adım", "isim"],
        response: "İsminizin Ayaz olduğunu biliyorum.",
    },
    FallbackRule {
        patterns: &["teşekkür", "sağ ol"],
        response: "Rica ederim! Size yardımcı olabildiğim için mutluyum.",
    },
    FallbackRule {
        patterns: &["merhaba", "selam"],
        response: "Merhaba! Ben Pahiy AI. Size nasıl yardımcı olabilirim?",
    },
];

const DEFAULT_FILLERS: &[&str] = &[
    "Anladım! Bu konuda size nasıl yardımcı olabilirim?",
    "Harika bir soru! Bunu şöyle açıklayabilirim...",
    "Bu konu hakkında daha önce de konuşmuştuk. Hatırlattığım iyi oldu!",
    "Size bu konuda detaylı bilgi verebilirim.",
    "Anlıyorum. Biraz daha detaylandırabilir misiniz?",
    "Bu harika bir nokta! Bunu daha önce düşünmemiştim.",
];

#[derive(Clone, Debug)]
pub struct FallbackResponder {
    rules: Vec<FallbackRule>,
    fillers: Vec<&'static str>,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec(), DEFAULT_FILLERS.to_vec())
    }
}

impl FallbackResponder {
    pub fn new(rules: Vec<FallbackRule>, fillers: Vec<&'static str>) -> Self {
        Self { rules, fillers }
    }

    /// Keyword reply, or a filler picked uniformly at random.
    pub fn reply<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> &'static str {
        let lowered = message.to_lowercase();
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&lowered)) {
            return rule.response;
        }
        self.fillers
            .choose(rng)
            .copied()
            .unwrap_or("Anladım!")
    }

    /// The reply as appended to the conversation, disclaimer included.
    pub fn offline_reply<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> String {
        format!("{}{OFFLINE_DISCLAIMER}", self.reply(message, rng))
    }
}
