use crate::model::{CardColors, ThemeOverride};
use crate::params::RenderParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// No overrides were supplied; the card renders the same everywhere.
    Single,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Themed<T> {
    pub mode: ThemeMode,
    pub params: T,
}

/// Parameter sets that carry a card color triple.
pub trait Themeable: Clone {
    fn colors_mut(&mut self) -> &mut CardColors;
}

impl Themeable for RenderParameters {
    fn colors_mut(&mut self) -> &mut CardColors {
        &mut self.colors
    }
}

/// One unchanged set when both overrides are empty, otherwise a dark set
/// followed by a light set.
pub fn resolve_themes<T: Themeable>(
    base: &T,
    light: &ThemeOverride,
    dark: &ThemeOverride,
) -> Vec<Themed<T>> {
    if light.is_empty() && dark.is_empty() {
        return vec![Themed {
            mode: ThemeMode::Single,
            params: base.clone(),
        }];
    }
    [(ThemeMode::Dark, dark), (ThemeMode::Light, light)]
        .into_iter()
        .map(|(mode, theme)| {
            let mut params = base.clone();
            theme.apply(params.colors_mut());
            Themed { mode, params }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HexColor, VideoId};

    fn base() -> RenderParameters {
        RenderParameters::new(VideoId::parse("abc").expect("id"))
    }

    #[test]
    fn no_overrides_yield_single_set() {
        let themed = resolve_themes(&base(), &ThemeOverride::default(), &ThemeOverride::default());
        assert_eq!(themed.len(), 1);
        assert_eq!(themed[0].mode, ThemeMode::Single);
        assert_eq!(themed[0].params, base());
    }

    #[test]
    fn one_override_still_yields_both_modes() {
        let dark = ThemeOverride {
            background: HexColor::parse("#000000"),
            ..ThemeOverride::default()
        };
        let themed = resolve_themes(&base(), &ThemeOverride::default(), &dark);
        assert_eq!(themed.len(), 2);
        assert_eq!(themed[0].mode, ThemeMode::Dark);
        assert_eq!(themed[0].params.colors.background.as_str(), "#000000");
        assert_eq!(themed[1].mode, ThemeMode::Light);
        assert_eq!(themed[1].params, base());
    }

    #[test]
    fn overrides_merge_over_base() {
        let light = ThemeOverride {
            background: HexColor::parse("#ffffff"),
            title: HexColor::parse("#000000"),
            stats: None,
        };
        let themed = resolve_themes(&base(), &light, &ThemeOverride::default());
        let light_params = &themed[1].params;
        assert_eq!(light_params.colors.background.as_str(), "#ffffff");
        assert_eq!(light_params.colors.title.as_str(), "#000000");
        assert_eq!(light_params.colors.stats, base().colors.stats);
        assert_eq!(light_params.id, base().id);
    }
}
