use std::collections::HashMap;

/// Suffix rewrite rules, tried in order; the first matching rule wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ies", "y"),
    ("oes", "o"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("s", ""),
];

/// Endings that look plural but are not (`glass`, `asparagus`, `swiss`, `couscous`).
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Noun lemmatizer: maps plural surface forms to their dictionary base form.
///
/// Irregular forms are resolved through an exception table; everything else
/// goes through a small set of English plural suffix rules.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
}

impl Lemmatizer {
    pub fn new<'a>(exceptions: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        Self {
            exceptions: exceptions
                .into_iter()
                .map(|(word, lemma)| (word.clone(), lemma.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return lemma.clone();
        }

        let len = word.chars().count();
        if len <= 3 || PROTECTED_ENDINGS.iter().any(|end| word.ends_with(end)) {
            return word.to_string();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            // `pies` -> `pie`, `toes` -> `toe`: the short forms only drop the `s`.
            if suffix.len() > 1 && stem.chars().count() < 2 {
                continue;
            }
            return format!("{stem}{replacement}");
        }

        word.to_string()
    }
}
