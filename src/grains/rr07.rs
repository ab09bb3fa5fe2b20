//! Grain model after Roberts et al. (2007), following the treatment in
//! UCLCHEM v1.3: single mantle reservoir with cosmic-ray, photon and
//! H2-formation-induced desorption, each cut off above a maximum binding
//! energy and switched off for vanishing mantles. The extended variant
//! RR07X adds thermal desorption.
use super::{check_process, not_implemented, BaseGrain, GrainRates};
use crate::error::ChemNetError;
use crate::reactions::{fnum, Reaction};
use crate::reactiontype::ReactionType;

#[derive(Debug, Clone, Default)]
pub struct Rr07Grain {
    pub base: BaseGrain,
}

impl Rr07Grain {
    fn mantle_guard(rate: String) -> String {
        format!("mantabund > 1e-30 ? ({}) : 0.0", rate)
    }
}

impl GrainRates for Rr07Grain {
    fn model(&self) -> &'static str {
        "rr07"
    }

    fn rate_depletion(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainFreeze, "depletion", Some(1))?;
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        let a = fnum(reac.alpha);
        let rg = &self.base.rg;
        let rate = if spec.is_electron() {
            format!(
                "4.57e4 * {} * gxsec * fr * ( 1.0 + 16.71e-4/({} * {}) )",
                a, rg, syms.tgas
            )
        } else if spec.charge == 0 {
            format!(
                "4.57e4 * {} * gxsec * fr * sqrt({} / {})",
                a,
                syms.tgas,
                fnum(spec.massnumber)
            )
        } else {
            format!(
                "4.57e4 * {} * gxsec * fr * sqrt({} / {}) * ( 1.0 + 16.71e-4/({} * {}) )",
                a,
                syms.tgas,
                fnum(spec.massnumber),
                rg,
                syms.tgas
            )
        };
        Ok(rate)
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
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        let rate = format!(
            "opt_crd * 4.0 * pi * crdeseff * ({}/{}) * 1.64e-4 * gxsec / mant",
            syms.crrate, syms.zism
        );
        let rate = format!(
            "eb_crd >= {} ? ({}) : 0.0",
            fnum(spec.binding_energy()?),
            rate
        );
        Ok(Self::mantle_guard(rate))
    }

    fn rate_photon_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbPhoton, "photon desorption", Some(1))?;
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        let phot = format!(
            "(({}/{}) + ({}/uvcreff) * exp(-1.8*{}))",
            syms.crrate, syms.zism, syms.radfield, syms.av
        );
        let rate = format!(
            "opt_uvd * 4.875e3 * gxsec * {} * {} / mant",
            phot,
            fnum(spec.photon_yield(0.1))
        );
        let rate = format!(
            "eb_uvd >= {} ? ({}) : 0.0",
            fnum(spec.binding_energy()?),
            rate
        );
        Ok(Self::mantle_guard(rate))
    }

    fn rate_h2_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbH2, "H2 desorption", Some(1))?;
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        let rate = format!(
            "opt_h2d * h2deseff * {} * y[IDX_HI] / mant",
            syms.h2form
        );
        let rate = format!(
            "eb_h2d >= {} ? ({}) : 0.0",
            fnum(spec.binding_energy()?),
            rate
        );
        Ok(Self::mantle_guard(rate))
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

/// RR07 with thermal desorption enabled.
#[derive(Debug, Clone, Default)]
pub struct Rr07xGrain {
    pub inner: Rr07Grain,
}

impl GrainRates for Rr07xGrain {
    fn model(&self) -> &'static str {
        "rr07x"
    }

    fn rate_depletion(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_depletion(reac)
    }

    fn rate_thermal_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbThermal, "thermal desorption", Some(1))?;
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        let rate = format!(
            "opt_thd * sqrt(2.0*sites*kerg*eb_{alias}/(pi*pi*amu*{mass})) * 2.0 * densites * exp(-eb_{alias}/{tdust})",
            alias = spec.alias,
            mass = fnum(spec.massnumber),
            tdust = syms.tdust
        );
        Ok(Rr07Grain::mantle_guard(rate))
    }

    fn rate_cosmicray_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_cosmicray_desorption(reac)
    }

    fn rate_photon_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_photon_desorption(reac)
    }

    fn rate_h2_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_h2_desorption(reac)
    }

    fn rate_reactive_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_reactive_desorption(reac)
    }

    fn rate_surface_twobody(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_surface_twobody(reac)
    }

    fn rate_electron_capture(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_electron_capture(reac)
    }

    fn rate_recombination(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        self.inner.rate_recombination(reac)
    }
}
