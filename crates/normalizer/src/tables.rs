//! Built-in data tables used by [`NormalizerConfig::default`](crate::NormalizerConfig).
//!
//! These are plain data; the pipeline never hard-codes any of them, so a
//! config file can replace each table independently.

/// Numeric quantities and fractions: `1`, `1 1/2`, `2-3`, `1/4`.
pub const QUANTITY_PATTERN: &str = r"\d+(\s\d+)?([/-]\d+)?";

/// Measurement units. Each entry is one regex alternative; entries not
/// ending in a literal period get a trailing word boundary and an optional one.
pub const UNIT_PATTERNS: &[&str] = &[
    r"\btbl?s?(p(s)?)?\.?",
    r"\btablespoons?",
    r"\btsps?",
    r"\bteaspoons?",
    r"\bcups?",
    r"\boz",
    r"\bounces?",
    r"\blbs?",
    r"\bpounds?",
    r"\bgrams?",
    r"\bml",
    r"\bquarts?",
    r"\bpints?",
    r"\bgallon",
    r"-inch",
    r"\bpackage",
    r"\bpkg\.",
    r"\bpackets?",
    r"\btube",
    r"\bsprigs?",
    r"\bt\.",
    r"-ish",
];

/// Descriptive and cooking words that carry no ingredient identity.
pub const DOMAIN_STOPWORDS: &[&str] = &[
    "fresh", "freshly", "chopped", "optional", "pinch", "taste", "white", "green", "note", "see",
    "like", "small", "large", "medium", "extra", "pieces", "piece", "adjust", "sliced", "diced",
    "minced", "water", "add", "added", "adding", "additional", "juice", "frozen", "half", "red",
    "handful", "used", "etc", "one", "cut", "shredded", "peeled", "use", "thinly",
];

/// General English stopwords.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Irregular plurals that suffix rules would get wrong.
pub const LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("halves", "half"),
    ("loaves", "loaf"),
    ("knives", "knife"),
    ("shelves", "shelf"),
    ("calves", "calf"),
    ("wolves", "wolf"),
    ("children", "child"),
    ("women", "woman"),
    ("men", "man"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("molasses", "molasses"),
    ("quiches", "quiche"),
    ("brioches", "brioche"),
    ("cookies", "cookie"),
    ("species", "species"),
    ("series", "series"),
];
