//! Keyword tables behind the enrichment heuristics and the industry-fit
//! scoring term.
//!
//! Every table is a plain substring match against lower-cased text, so short
//! tokens like `it` and `hr` also fire inside longer words ("digital",
//! "peoplehr").

/// A named list of lower-case keywords; matches when any of them occurs in
/// the text.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

impl KeywordTable {
    /// Case-insensitive match against `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.matches_lowered(&lowered)
    }

    pub(crate) fn matches_lowered(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(*k))
    }
}

/// Maps place type tags to an industry label.
#[derive(Debug, Clone, Copy)]
pub struct IndustryRule {
    pub industry: &'static str,
    pub table: KeywordTable,
}

pub const INFORMATION_TECHNOLOGY: &str = "Information Technology";

/// Checked in order; the first rule whose table matches the joined type tags
/// wins.
pub const TYPE_INDUSTRY_RULES: &[IndustryRule] = &[
    IndustryRule {
        industry: "Education",
        table: KeywordTable {
            name: "education_types",
            keywords: &["university", "school", "college"],
        },
    },
    IndustryRule {
        industry: "Healthcare",
        table: KeywordTable {
            name: "healthcare_types",
            keywords: &["hospital", "health"],
        },
    },
    IndustryRule {
        industry: "Financial Services",
        table: KeywordTable {
            name: "financial_types",
            keywords: &["bank", "finance"],
        },
    },
    IndustryRule {
        industry: INFORMATION_TECHNOLOGY,
        table: KeywordTable {
            name: "it_types",
            keywords: &["software", "it", "technology"],
        },
    },
];

/// Organization names that suggest an IT business when no type tag decided.
pub const NAME_IT_KEYWORDS: KeywordTable = KeywordTable {
    name: "name_it",
    keywords: &[
        "software",
        "it",
        "technology",
        "info tech",
        "saas",
        "cloud",
        "analytics",
        "ai",
        "data",
    ],
};

/// Learning, training, HR and people-development vocabulary.
pub const LD_SIGNAL_KEYWORDS: KeywordTable = KeywordTable {
    name: "ld_signal",
    keywords: &[
        "learning",
        "training",
        "l&d",
        "human resources",
        "hr",
        "people development",
        "upskilling",
    ],
};

/// Name suffixes that earn the [`MID_SIZE_ESTIMATE`] headcount.
pub const SIZE_NAME_KEYWORDS: KeywordTable = KeywordTable {
    name: "size_name",
    keywords: &["labs", "solutions", "systems", "technologies", "global"],
};

/// Placeholder headcount for names matching [`SIZE_NAME_KEYWORDS`].
pub const MID_SIZE_ESTIMATE: u32 = 200;

/// Industries that earn the industry-fit scoring term.
pub const INDUSTRY_FIT_KEYWORDS: KeywordTable = KeywordTable {
    name: "industry_fit",
    keywords: &[
        "information technology",
        "financial",
        "professional services",
        "education",
    ],
};
