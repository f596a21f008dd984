// Built-in stop words for the local extractor
use ahash::{HashSet, HashSetExt};

const CHINESE: &[&str] = &[
    "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "那", "他",
    "她", "它", "们", "我们", "你们", "他们", "她们", "它们", "这个", "那个", "这些", "那些",
    "什么", "怎么", "因为", "所以", "但是", "而且", "如果", "虽然", "可以", "还是", "已经", "就是",
    "还", "又", "与", "及", "等", "对", "把", "被", "从", "向", "为", "以", "之", "其", "或", "而",
    "并", "但", "让", "给", "吗", "呢", "吧", "啊", "哦", "呀", "嗯", "地", "得", "么", "个", "中",
    "里", "来", "过", "没", "能", "将", "这样", "那样", "以及", "其中", "然后", "只是", "不是",
];

// Function particles that never start or end a content word
const PARTICLES: &[char] = &[
    '的', '了', '着', '是', '和', '与', '及', '等', '或', '而', '之', '把', '被', '吗', '呢', '吧',
    '啊', '呀', '哦', '嗯', '么',
];

const ENGLISH: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "of", "to", "in", "on", "at", "by", "for",
    "with", "from", "as", "is", "are", "was", "were", "be", "been", "being", "it", "its", "this",
    "that", "these", "those", "i", "you", "he", "she", "we", "they", "me", "him", "her", "us",
    "them", "my", "your", "his", "our", "their", "not", "no", "so", "do", "does", "did", "have",
    "has", "had", "will", "would", "can", "could", "should", "may", "might", "must", "just",
    "than", "too", "very", "also", "about", "into", "over", "after", "before", "up", "down",
    "out", "more", "most", "such", "only", "own", "same", "there", "here", "what", "which", "who",
    "when", "where", "how", "all", "any", "each",
];

/// Stop-word lookup, case-insensitive for cased scripts
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Built-in Chinese and English list plus `extra`
    pub fn builtin_with<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut stop = Self::empty();
        for word in CHINESE.iter().chain(ENGLISH) {
            stop.insert(word);
        }
        for word in extra {
            stop.insert(word.as_ref());
        }
        stop
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if !word.is_empty() {
            self.words.insert(word.to_lowercase());
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Particles that end an ideograph run, limited to those still stop words
    pub fn run_breakers(&self) -> HashSet<char> {
        PARTICLES
            .iter()
            .copied()
            .filter(|c| self.contains(c.encode_utf8(&mut [0; 4])))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
