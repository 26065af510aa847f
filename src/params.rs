//! Validated timing/identity tunables a [`crate::Node`] is constructed with.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::InvariantViolation;

/// TPING/TFAIL/TREMOVE and the introducer address, in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Ticks between dissemination rounds.
    pub tping: u32,
    /// Ticks of silence after which a peer is marked suspected.
    pub tfail: i32,
    /// Ticks of silence after which a suspected peer is evicted.
    pub tremove: i32,
    pub introducer: Address,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            tping: 3,
            tfail: 5,
            tremove: 20,
            introducer: Address::INTRODUCER,
        }
    }
}

impl Params {
    pub fn new(tping: u32, tfail: i32, tremove: i32) -> Result<Self, InvariantViolation> {
        let params = Params {
            tping,
            tfail,
            tremove,
            introducer: Address::INTRODUCER,
        };
        params.validate()?;
        Ok(params)
    }

    /// The original C++ reference never checked this at startup; a
    /// misconfigured node would silently evict before ever suspecting.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.tping == 0 {
            return Err(InvariantViolation::NonPositivePingPeriod(self.tping));
        }
        if self.tfail >= self.tremove {
            return Err(InvariantViolation::FailNotBeforeRemove {
                tfail: self.tfail,
                tremove: self.tremove,
            });
        }
        Ok(())
    }
}

/// Load `Params` from `mu-conf.yaml` plus `MEMBERSHIP__`-prefixed environment
/// overrides (e.g. `MEMBERSHIP__TFAIL=10`), validating before returning. The
/// core state machine itself never depends on this loader, only on the
/// resulting validated `Params` value.
pub fn load(config_path: &str) -> anyhow::Result<Params> {
    use config::{Config, Environment, File, FileFormat};

    let builder = Config::builder()
        .set_default("tping", 3i64)?
        .set_default("tfail", 5i64)?
        .set_default("tremove", 20i64)?
        .set_default("introducer.id", 1i64)?
        .set_default("introducer.port", 0i64)?
        .add_source(File::new(config_path, FileFormat::Yaml).required(false))
        .add_source(
            Environment::default()
                .prefix("MEMBERSHIP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let raw = builder.build()?;
    let params = Params {
        tping: raw.get_int("tping")?.try_into()?,
        tfail: raw.get_int("tfail")?.try_into()?,
        tremove: raw.get_int("tremove")?.try_into()?,
        introducer: Address::new(
            raw.get_int("introducer.id")?.try_into()?,
            raw.get_int("introducer.port")?.try_into()?,
        ),
    };
    params.validate()?;
    Ok(params)
}
