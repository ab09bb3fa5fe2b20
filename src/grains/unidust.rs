//! Parameter-only grain description used when the surface rate laws are
//! supplied externally (e.g. hand-written code around the generated ODE).
//! Accretion falls back to the geometric base law; every other process is
//! reported as missing so a network cannot silently rely on it.
use super::{check_process, not_implemented, BaseGrain, GrainRates};
use crate::error::ChemNetError;
use crate::reactions::Reaction;
use crate::reactiontype::ReactionType;

#[derive(Debug, Clone)]
pub struct UniDustGrain {
    pub base: BaseGrain,
    pub albedo: String,
    pub barrier: String,
    pub sites: String,
    pub hop_ratio: String,
    pub monolayers: String,
    pub duty_cycle: String,
    pub cr_temperature: String,
    pub branch_ratio: String,
}

impl Default for UniDustGrain {
    fn default() -> Self {
        UniDustGrain {
            base: BaseGrain::default(),
            albedo: "omega".to_string(),
            barrier: "barr".to_string(),
            sites: "sites".to_string(),
            hop_ratio: "hop".to_string(),
            monolayers: "nMono".to_string(),
            duty_cycle: "duty".to_string(),
            cr_temperature: "Tcr".to_string(),
            branch_ratio: "branch".to_string(),
        }
    }
}

impl GrainRates for UniDustGrain {
    fn model(&self) -> &'static str {
        "unidust"
    }

    fn rate_depletion(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainFreeze, "depletion", Some(1))?;
        Ok(self.base.depletion_expr(reac, None))
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
    use crate::grains::{GrainModel, GrainRates};
    use crate::reactions::Format;
    use crate::species::{ChemContext, Species};

    #[test]
    fn test_only_accretion_defined() {
        let ctx = ChemContext::default();
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = vec![Species::parse("CO", &ctx).unwrap()];
        reac.products = vec![Species::parse("#CO", &ctx).unwrap()];
        reac.alpha = 1.0;
        reac.reaction_type = ReactionType::GrainFreeze;
        let grain: GrainModel = UniDustGrain::default().into();
        assert!(grain.rateexpr(&reac).is_ok());

        reac.reaction_type = ReactionType::GrainDesorbPhoton;
        let err = grain.rateexpr(&reac).unwrap_err();
        assert!(err.to_string().contains("unidust"));
    }
}
