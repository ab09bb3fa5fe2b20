//! Grain-surface physics models. Each model renders the rate coefficient of
//! gas-grain and surface processes as a C expression over the model's own
//! symbols (grain radius, site density, mantle coverage, ...). Concrete
//! models implement the processes they define and report a clear error for
//! the rest, so a network cannot silently use a formula its model lacks.
pub mod hh93;
pub mod rr07;
pub mod unidust;

use crate::error::ChemNetError;
use crate::reactions::Reaction;
use crate::reactiontype::ReactionType;
use crate::species::Species;
use enum_dispatch::enum_dispatch;

pub use hh93::Hh93Grain;
pub use rr07::{Rr07Grain, Rr07xGrain};
pub use unidust::UniDustGrain;

#[enum_dispatch]
pub trait GrainRates {
    fn model(&self) -> &'static str;

    fn rate_depletion(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_thermal_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_cosmicray_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_photon_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_h2_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_reactive_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_surface_twobody(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_electron_capture(&self, reac: &Reaction) -> Result<String, ChemNetError>;
    fn rate_recombination(&self, reac: &Reaction) -> Result<String, ChemNetError>;

    /// Route a grain-process reaction to the matching rate method.
    fn rateexpr(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        use ReactionType::*;
        match reac.reaction_type {
            GrainRecombine => self.rate_recombination(reac),
            GrainFreeze => self.rate_depletion(reac),
            GrainDesorbThermal => self.rate_thermal_desorption(reac),
            GrainDesorbPhoton => self.rate_photon_desorption(reac),
            GrainDesorbCosmicRay => self.rate_cosmicray_desorption(reac),
            GrainDesorbH2 => self.rate_h2_desorption(reac),
            GrainDesorbReactive => self.rate_reactive_desorption(reac),
            SurfaceTwobody => self.rate_surface_twobody(reac),
            GrainECapture => self.rate_electron_capture(reac),
            other => Err(ChemNetError::NotImplementedInModel {
                model: self.model().to_string(),
                process: other.to_string(),
            }),
        }
    }
}

#[enum_dispatch(GrainRates)]
#[derive(Debug, Clone)]
pub enum GrainModel {
    Base(BaseGrain),
    Hh93(Hh93Grain),
    Rr07(Rr07Grain),
    Rr07x(Rr07xGrain),
    UniDust(UniDustGrain),
}

impl GrainModel {
    pub fn by_name(name: &str) -> Option<GrainModel> {
        match name.to_lowercase().as_str() {
            "base" => Some(BaseGrain::default().into()),
            "hh93" => Some(Hh93Grain::default().into()),
            "rr07" => Some(Rr07Grain::default().into()),
            "rr07x" => Some(Rr07xGrain::default().into()),
            "unidust" => Some(UniDustGrain::default().into()),
            _ => None,
        }
    }
}

/// Shared guard: the reaction must carry the expected type and, where
/// given, the expected number of reactants.
pub(crate) fn check_process(
    reac: &Reaction,
    expected: ReactionType,
    process: &str,
    n_reactants: Option<usize>,
) -> Result<(), ChemNetError> {
    if reac.reaction_type != expected {
        return Err(ChemNetError::TypeMismatch {
            rtype: reac.reaction_type.to_string(),
            process: process.to_string(),
        });
    }
    if let Some(n) = n_reactants {
        if reac.reactants.len() != n {
            return Err(ChemNetError::RateExpression(format!(
                "number of reactants in {} should be {}, found {} in \"{}\"",
                process,
                n,
                reac.reactants.len(),
                reac
            )));
        }
    }
    Ok(())
}

fn not_implemented(model: &str, process: &str) -> ChemNetError {
    ChemNetError::NotImplementedInModel {
        model: model.to_string(),
        process: process.to_string(),
    }
}

/// Base grain model: geometric cross-section accretion only. All other
/// processes are undefined here and are supplied by concrete models.
#[derive(Debug, Clone)]
pub struct BaseGrain {
    /// Symbol of the grain radius in cm.
    pub rg: String,
    /// Symbol or expression of the grain number density.
    pub gdens: String,
}

impl Default for BaseGrain {
    fn default() -> Self {
        BaseGrain {
            rg: "rG".to_string(),
            gdens: "gdens".to_string(),
        }
    }
}

impl BaseGrain {
    /// Build a model whose grain density is the summed abundance of the
    /// given grain species, e.g. GRAIN0 and GRAIN-.
    pub fn with_grain_species(species: &[Species]) -> BaseGrain {
        let mut grain = BaseGrain::default();
        if !species.is_empty() {
            let sum = species
                .iter()
                .map(|s| format!("y[IDX_{}]", s.alias))
                .collect::<Vec<_>>()
                .join(" + ");
            grain.gdens = format!("({})", sum);
        }
        grain
    }

    pub(crate) fn depletion_expr(&self, reac: &Reaction, option: Option<&str>) -> String {
        let spec = &reac.reactants[0];
        let syms = reac.symbols();
        let opt = option.map(|o| format!("{} * ", o)).unwrap_or_default();
        format!(
            "{}{} * pi * {} * {} * {} * sqrt(8.0 * kerg * {}/ (pi*amu*{}))",
            opt,
            crate::reactions::fnum(reac.alpha),
            self.rg,
            self.rg,
            self.gdens,
            syms.tgas,
            crate::reactions::fnum(spec.massnumber)
        )
    }
}

impl GrainRates for BaseGrain {
    fn model(&self) -> &'static str {
        "base"
    }

    fn rate_depletion(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainFreeze, "depletion", Some(1))?;
        Ok(self.depletion_expr(reac, None))
    }

    fn rate_thermal_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbThermal, "thermal desorption", Some(1))?;
        Err(not_implemented(self.model(), "thermal desorption"))
    }

    fn rate_cosmicray_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(
            reac,
            ReactionType::GrainDesorbCosmicRay,
            "cosmic-ray desorption",
            Some(1),
        )?;
        Err(not_implemented(self.model(), "cosmic-ray desorption"))
    }

    fn rate_photon_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbPhoton, "photon desorption", Some(1))?;
        Err(not_implemented(self.model(), "photon desorption"))
    }

    fn rate_h2_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbH2, "H2 desorption", Some(1))?;
        Err(not_implemented(self.model(), "H2 desorption"))
    }

    fn rate_reactive_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(
            reac,
            ReactionType::GrainDesorbReactive,
            "reactive desorption",
            Some(2),
        )?;
        Err(not_implemented(self.model(), "reactive desorption"))
    }

    fn rate_surface_twobody(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::SurfaceTwobody, "surface two-body", Some(2))?;
        Err(not_implemented(self.model(), "surface two-body"))
    }

    fn rate_electron_capture(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainECapture, "electron capture", None)?;
        Err(not_implemented(self.model(), "electron capture"))
    }

    fn rate_recombination(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainRecombine, "recombination", None)?;
        Err(not_implemented(self.model(), "recombination"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactions::Format;
    use crate::species::ChemContext;

    fn freeze_reaction() -> Reaction {
        let ctx = ChemContext::default();
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = vec![Species::parse("CO", &ctx).unwrap()];
        reac.products = vec![Species::parse("#CO", &ctx).unwrap()];
        reac.alpha = 1.0;
        reac.reaction_type = ReactionType::GrainFreeze;
        reac
    }

    #[test]
    fn test_base_depletion() {
        let grain: GrainModel = BaseGrain::default().into();
        let rate = grain.rateexpr(&freeze_reaction()).unwrap();
        assert!(rate.contains("pi * rG * rG * gdens"));
        assert!(rate.contains("sqrt(8.0 * kerg * Tgas/ (pi*amu*28.0))"));
    }

    #[test]
    fn test_base_rejects_undefined_processes() {
        let grain: GrainModel = BaseGrain::default().into();
        let mut reac = freeze_reaction();
        reac.reaction_type = ReactionType::GrainDesorbThermal;
        assert!(matches!(
            grain.rateexpr(&reac),
            Err(ChemNetError::NotImplementedInModel { .. })
        ));
    }

    #[test]
    fn test_type_guard() {
        let grain: GrainModel = BaseGrain::default().into();
        let reac = freeze_reaction();
        assert!(matches!(
            grain.rate_thermal_desorption(&reac),
            Err(ChemNetError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_grain_density_from_species() {
        let ctx = ChemContext::default();
        let grains = [
            Species::parse("GRAIN0", &ctx).unwrap(),
            Species::parse("GRAIN-", &ctx).unwrap(),
        ];
        let grain = BaseGrain::with_grain_species(&grains);
        assert_eq!(grain.gdens, "(y[IDX_GRAIN0I] + y[IDX_GRAINM])");
    }
}
