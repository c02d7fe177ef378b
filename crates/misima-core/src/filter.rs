//! Three-way blend filter for the collection listing.
//!
//! The filter starts in [`FilterMode::Independent`] with every blend shown.
//! A URL that names a blend on load selects only that blend and switches the
//! filter to [`FilterMode::Exclusive`] for the rest of its life, after which
//! clicking a blend shows only that blend. There is no way back to
//! independent mode.

use serde::Serialize;

use crate::blend::Blend;
use crate::descriptor::ProductDescriptor;

const QUERY_SUFFIX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Each click flips one blend.
    Independent,
    /// Each click shows exactly one blend.
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionFilter {
    pub pablo: bool,
    pub maria: bool,
    pub diego: bool,
    pub mode: FilterMode,
}

impl Default for CollectionFilter {
    fn default() -> Self {
        Self {
            pablo: true,
            maria: true,
            diego: true,
            mode: FilterMode::Independent,
        }
    }
}

impl CollectionFilter {
    fn only(blend: Blend, mode: FilterMode) -> Self {
        Self {
            pablo: blend == Blend::Pablo,
            maria: blend == Blend::Maria,
            diego: blend == Blend::Diego,
            mode,
        }
    }

    /// Initial state from the raw query string (with or without `?`).
    ///
    /// Only the trailing five characters are inspected, so
    /// `?collection=maria` and `?blend=maria` both select Maria.
    #[must_use]
    pub fn from_query(search: &str) -> Self {
        let chars: Vec<char> = search.chars().collect();
        let start = chars.len().saturating_sub(QUERY_SUFFIX_LEN);
        let suffix: String = chars[start..].iter().collect();

        match Blend::from_slug(&suffix) {
            Some(blend) => Self::only(blend, FilterMode::Exclusive),
            None => Self::default(),
        }
    }

    /// Applies a click on `blend`.
    #[must_use]
    pub fn reduce(self, blend: Blend) -> Self {
        match self.mode {
            FilterMode::Exclusive => Self::only(blend, FilterMode::Exclusive),
            FilterMode::Independent => {
                let mut next = self;
                match blend {
                    Blend::Pablo => next.pablo = !next.pablo,
                    Blend::Maria => next.maria = !next.maria,
                    Blend::Diego => next.diego = !next.diego,
                }
                next
            }
        }
    }

    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        self.mode == FilterMode::Exclusive
    }

    #[must_use]
    pub fn shows(&self, blend: Blend) -> bool {
        match blend {
            Blend::Pablo => self.pablo,
            Blend::Maria => self.maria,
            Blend::Diego => self.diego,
        }
    }

    /// A product is listed only when its collection is a shown blend.
    #[must_use]
    pub fn shows_product(&self, descriptor: &ProductDescriptor) -> bool {
        descriptor.blend().is_some_and(|b| self.shows(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_description;

    #[test]
    fn default_shows_everything_in_independent_mode() {
        let f = CollectionFilter::default();
        assert!(Blend::ALL.iter().all(|b| f.shows(*b)));
        assert!(!f.is_exclusive());
    }

    #[test]
    fn query_ending_in_blend_selects_it_exclusively() {
        let f = CollectionFilter::from_query("?collection=pablo");
        assert_eq!(
            f,
            CollectionFilter {
                pablo: true,
                maria: false,
                diego: false,
                mode: FilterMode::Exclusive,
            }
        );
    }

    #[test]
    fn unrelated_query_keeps_default() {
        assert_eq!(CollectionFilter::from_query(""), CollectionFilter::default());
        assert_eq!(
            CollectionFilter::from_query("?cursor=abc"),
            CollectionFilter::default()
        );
        assert_eq!(
            CollectionFilter::from_query("?collection=PABLO"),
            CollectionFilter::default()
        );
    }

    #[test]
    fn short_query_is_handled() {
        assert_eq!(CollectionFilter::from_query("?a"), CollectionFilter::default());
        assert!(CollectionFilter::from_query("diego").is_exclusive());
    }

    #[test]
    fn independent_toggle_twice_is_identity() {
        for blend in Blend::ALL {
            let f = CollectionFilter::default();
            assert_eq!(f.reduce(blend).reduce(blend), f);
        }
    }

    #[test]
    fn independent_toggle_flips_only_one_blend() {
        let f = CollectionFilter::default().reduce(Blend::Maria);
        assert!(f.pablo);
        assert!(!f.maria);
        assert!(f.diego);
    }

    #[test]
    fn exclusive_mode_always_leaves_exactly_one_blend() {
        let mut f = CollectionFilter::from_query("?c=maria");
        for blend in [Blend::Diego, Blend::Diego, Blend::Pablo, Blend::Maria] {
            f = f.reduce(blend);
            let shown = Blend::ALL.iter().filter(|b| f.shows(**b)).count();
            assert_eq!(shown, 1);
            assert!(f.shows(blend));
            assert!(f.is_exclusive());
        }
    }

    #[test]
    fn shows_product_by_parsed_collection() {
        let maria = parse_description(
            "Collection- Maria, Format- Robusto, Length- 5in, Diameter- 50, Weight- 20g, Per Box- 20",
        )
        .unwrap();
        let other = parse_description(
            "Collection- Limited, Format- Robusto, Length- 5in, Diameter- 50, Weight- 20g, Per Box- 20",
        )
        .unwrap();

        let f = CollectionFilter::from_query("?collection=maria");
        assert!(f.shows_product(&maria));
        assert!(!f.shows_product(&other));
        assert!(!CollectionFilter::default().shows_product(&other));
        assert!(!f.reduce(Blend::Pablo).shows_product(&maria));
    }
}
