//! CLDR-style plural categories and per-language rules.
//!
//! Rules operate on integer counts only. Negative counts are categorized
//! by their absolute value.

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// The lowercase CLDR name, used as a dictionary key suffix
    /// (`items_one`, `items_other`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    /// Parse a CLDR category name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Plural forms for a single message.
///
/// `one` and `other` are required; the remaining forms fall back to
/// `other` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralForms {
    pub zero: Option<String>,
    pub one: String,
    pub two: Option<String>,
    pub few: Option<String>,
    pub many: Option<String>,
    pub other: String,
}

impl PluralForms {
    /// Select the form for a category.
    #[must_use]
    pub fn select(&self, category: PluralCategory) -> &str {
        let optional = match category {
            PluralCategory::One => return &self.one,
            PluralCategory::Other => return &self.other,
            PluralCategory::Zero => &self.zero,
            PluralCategory::Two => &self.two,
            PluralCategory::Few => &self.few,
            PluralCategory::Many => &self.many,
        };
        optional.as_deref().unwrap_or(&self.other)
    }
}

/// Plural rule for a language family.
#[derive(Debug, Clone, Copy)]
pub enum PluralRule {
    /// one: n = 1; other.
    English,
    /// East Slavic: one, few, many.
    Russian,
    /// zero, one, two, few, many, other.
    Arabic,
    /// one: n = 0 or 1; other.
    French,
    /// No plural distinction.
    CJK,
    /// one, few, many.
    Polish,
    /// Caller-supplied rule.
    Custom(fn(i64) -> PluralCategory),
}

impl PluralRule {
    /// Pick a rule from a locale tag by its base language.
    ///
    /// Unknown languages use [`PluralRule::English`].
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let base = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match base.as_str() {
            "ru" | "uk" | "be" => Self::Russian,
            "ar" => Self::Arabic,
            "fr" | "pt" => Self::French,
            "zh" | "ja" | "ko" | "vi" | "th" => Self::CJK,
            "pl" => Self::Polish,
            _ => Self::English,
        }
    }

    /// Categorize a count.
    #[must_use]
    pub fn categorize(&self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::English => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::French => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::CJK => PluralCategory::Other,
            Self::Russian => {
                let (m10, m100) = (n % 10, n % 100);
                if m10 == 1 && m100 != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&m10) && !(12..=14).contains(&m100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Polish => {
                let (m10, m100) = (n % 10, n % 100);
                if n == 1 {
                    PluralCategory::One
                } else if (2..=4).contains(&m10) && !(12..=14).contains(&m100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Arabic => {
                let m100 = n % 100;
                match n {
                    0 => PluralCategory::Zero,
                    1 => PluralCategory::One,
                    2 => PluralCategory::Two,
                    _ if (3..=10).contains(&m100) => PluralCategory::Few,
                    _ if (11..=99).contains(&m100) => PluralCategory::Many,
                    _ => PluralCategory::Other,
                }
            }
            Self::Custom(rule) => rule(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english() {
        assert_eq!(PluralRule::English.categorize(0), PluralCategory::Other);
        assert_eq!(PluralRule::English.categorize(1), PluralCategory::One);
        assert_eq!(PluralRule::English.categorize(-1), PluralCategory::One);
        assert_eq!(PluralRule::English.categorize(2), PluralCategory::Other);
    }

    #[test]
    fn russian() {
        let r = PluralRule::Russian;
        assert_eq!(r.categorize(1), PluralCategory::One);
        assert_eq!(r.categorize(21), PluralCategory::One);
        assert_eq!(r.categorize(11), PluralCategory::Many);
        assert_eq!(r.categorize(3), PluralCategory::Few);
        assert_eq!(r.categorize(13), PluralCategory::Many);
        assert_eq!(r.categorize(5), PluralCategory::Many);
    }

    #[test]
    fn arabic() {
        let r = PluralRule::Arabic;
        assert_eq!(r.categorize(0), PluralCategory::Zero);
        assert_eq!(r.categorize(2), PluralCategory::Two);
        assert_eq!(r.categorize(103), PluralCategory::Few);
        assert_eq!(r.categorize(111), PluralCategory::Many);
        assert_eq!(r.categorize(100), PluralCategory::Other);
    }

    #[test]
    fn polish_one_only_for_exactly_one() {
        assert_eq!(PluralRule::Polish.categorize(1), PluralCategory::One);
        assert_eq!(PluralRule::Polish.categorize(21), PluralCategory::Many);
        assert_eq!(PluralRule::Polish.categorize(22), PluralCategory::Few);
    }

    #[test]
    fn custom_rule() {
        fn always_few(_: i64) -> PluralCategory {
            PluralCategory::Few
        }
        assert_eq!(
            PluralRule::Custom(always_few).categorize(1),
            PluralCategory::Few
        );
    }

    #[test]
    fn for_locale_uses_base_language() {
        assert!(matches!(PluralRule::for_locale("ru-RU"), PluralRule::Russian));
        assert!(matches!(PluralRule::for_locale("fr_CA"), PluralRule::French));
        assert!(matches!(PluralRule::for_locale("ZH"), PluralRule::CJK));
        assert!(matches!(PluralRule::for_locale(""), PluralRule::English));
    }

    #[test]
    fn select_falls_back_to_other() {
        let forms = PluralForms {
            one: "one".into(),
            few: Some("few".into()),
            other: "other".into(),
            ..Default::default()
        };
        assert_eq!(forms.select(PluralCategory::Few), "few");
        assert_eq!(forms.select(PluralCategory::Many), "other");
        assert_eq!(forms.select(PluralCategory::One), "one");
    }

    #[test]
    fn category_names_round_trip() {
        for cat in [
            PluralCategory::Zero,
            PluralCategory::One,
            PluralCategory::Two,
            PluralCategory::Few,
            PluralCategory::Many,
            PluralCategory::Other,
        ] {
            assert_eq!(PluralCategory::from_name(cat.as_str()), Some(cat));
        }
        assert_eq!(PluralCategory::from_name("plural"), None);
    }
}
