use crate::config::VisualConfig;
use crate::error::Result;

/// Attributes a display platform can report for one of its configs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConfigAttrib {
    RedSize,
    GreenSize,
    BlueSize,
    AlphaSize,
    DepthSize,
    StencilSize,
    BufferSize,
    /// Bitmask of client APIs the config can render with.
    RenderableType,
}

impl ConfigAttrib {
    /// The bit-depth attributes, in [`VisualConfig`] field order.
    pub const VISUAL: [ConfigAttrib; 7] = [
        ConfigAttrib::RedSize,
        ConfigAttrib::GreenSize,
        ConfigAttrib::BlueSize,
        ConfigAttrib::AlphaSize,
        ConfigAttrib::DepthSize,
        ConfigAttrib::StencilSize,
        ConfigAttrib::BufferSize,
    ];
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderApi {
    Gles2,
    Gles3,
}

impl RenderApi {
    pub const fn bit(self) -> u32 {
        match self {
            RenderApi::Gles2 => 0x0004,
            RenderApi::Gles3 => 0x0040,
        }
    }
}

/// Minimum requirements handed to the platform when enumerating configs.
///
/// Size attributes use at-least semantics: a candidate passes when each of
/// its sizes is greater than or equal to the requested one. The renderable
/// type is a bitmask that must contain every requested bit. The platform
/// decides how to apply this; [`ConfigFilter::accepts`] is the reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigFilter {
    attribs: Vec<(ConfigAttrib, u32)>,
}

impl ConfigFilter {
    pub fn for_target(target: &VisualConfig, api: RenderApi) -> Self {
        Self {
            attribs: vec![
                (ConfigAttrib::RedSize, target.red),
                (ConfigAttrib::GreenSize, target.green),
                (ConfigAttrib::BlueSize, target.blue),
                (ConfigAttrib::AlphaSize, target.alpha),
                (ConfigAttrib::DepthSize, target.depth),
                (ConfigAttrib::StencilSize, target.stencil),
                (ConfigAttrib::BufferSize, target.buffer),
                (ConfigAttrib::RenderableType, api.bit()),
            ],
        }
    }

    pub fn attribs(&self) -> &[(ConfigAttrib, u32)] {
        &self.attribs
    }

    pub fn get(&self, attrib: ConfigAttrib) -> Option<u32> {
        self.attribs
            .iter()
            .find(|(key, _)| *key == attrib)
            .map(|(_, value)| *value)
    }

    /// Checks a candidate against the filter. `probe` returns the
    /// candidate's value for an attribute; unreadable attributes fail.
    pub fn accepts<F>(&self, mut probe: F) -> bool
    where
        F: FnMut(ConfigAttrib) -> Option<u32>,
    {
        self.attribs.iter().all(|&(attrib, wanted)| {
            let Some(actual) = probe(attrib) else {
                return false;
            };
            match attrib {
                ConfigAttrib::RenderableType => actual & wanted == wanted,
                _ => actual >= wanted,
            }
        })
    }
}

/// Enumerates surface configs and creates surfaces from them.
///
/// Implemented by every display back end. `Config` is an opaque handle;
/// the harness only ever reads it back through [`config_attrib`].
///
/// [`config_attrib`]: DisplayPlatform::config_attrib
pub trait DisplayPlatform {
    type Config;
    type Surface;

    /// Number of configs matching `filter`.
    fn count_configs(&self, filter: &ConfigFilter) -> Result<usize>;

    /// Up to `max` matching configs, in the platform's preferred order.
    fn fetch_configs(
        &self,
        filter: &ConfigFilter,
        max: usize,
    ) -> Result<Vec<Self::Config>>;

    /// `None` when the attribute cannot be read for this config.
    fn config_attrib(
        &self,
        config: &Self::Config,
        attrib: ConfigAttrib,
    ) -> Option<u32>;

    fn create_surface(&mut self, config: &Self::Config)
    -> Result<Self::Surface>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_for(
        config: VisualConfig,
        renderable: u32,
    ) -> impl FnMut(ConfigAttrib) -> Option<u32> {
        move |attrib| {
            Some(match attrib {
                ConfigAttrib::RedSize => config.red,
                ConfigAttrib::GreenSize => config.green,
                ConfigAttrib::BlueSize => config.blue,
                ConfigAttrib::AlphaSize => config.alpha,
                ConfigAttrib::DepthSize => config.depth,
                ConfigAttrib::StencilSize => config.stencil,
                ConfigAttrib::BufferSize => config.buffer,
                ConfigAttrib::RenderableType => renderable,
            })
        }
    }

    #[test]
    fn filter_carries_target_and_api_bit() {
        let target = VisualConfig::default();
        let filter = ConfigFilter::for_target(&target, RenderApi::Gles2);

        assert_eq!(filter.get(ConfigAttrib::GreenSize), Some(6));
        assert_eq!(filter.get(ConfigAttrib::DepthSize), Some(16));
        assert_eq!(filter.get(ConfigAttrib::RenderableType), Some(4));
        assert_eq!(filter.attribs().len(), 8);
    }

    #[test]
    fn accepts_deeper_and_rejects_shallower() {
        let target = VisualConfig::default();
        let filter = ConfigFilter::for_target(&target, RenderApi::Gles2);
        let es2_es3 = RenderApi::Gles2.bit() | RenderApi::Gles3.bit();

        assert!(filter.accepts(probe_for(
            VisualConfig::new(8, 8, 8, 8, 24, 8, 32),
            es2_es3
        )));
        assert!(!filter.accepts(probe_for(
            VisualConfig::new(5, 6, 5, 0, 0, 0, 16),
            es2_es3
        )));
        assert!(!filter.accepts(probe_for(
            VisualConfig::new(8, 8, 8, 8, 24, 8, 32),
            RenderApi::Gles3.bit()
        )));
    }

    #[test]
    fn unreadable_attribute_is_rejected() {
        let target = VisualConfig::default();
        let filter = ConfigFilter::for_target(&target, RenderApi::Gles2);
        assert!(!filter.accepts(|_| None));
    }
}
