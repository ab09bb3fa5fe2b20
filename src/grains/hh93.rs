//! Grain model after Hasegawa, Herbst & Leung (1993): multilayer ice mantle
//! with thermal, cosmic-ray and photon desorption, surface two-body
//! reactions with quantum tunneling for atomic and molecular hydrogen, and
//! reactive desorption as a branching of the surface reaction rate.
use super::{check_process, not_implemented, BaseGrain, GrainRates};
use crate::error::ChemNetError;
use crate::reactions::{exp_term, fnum, Reaction};
use crate::reactiontype::ReactionType;
use crate::species::Species;

#[derive(Debug, Clone, Default)]
pub struct Hh93Grain {
    pub base: BaseGrain,
}

/// Light species hop between surface sites by tunneling as well as by
/// thermal diffusion.
fn tunnels(spec: &Species) -> bool {
    spec.is_surface && (spec.gasname == "H" || spec.gasname == "H2")
}

impl Hh93Grain {
    /// Surface two-body rate shared between the reaction itself and its
    /// reactive-desorption branch. The faster of the thermal and quantum
    /// diffusion (and barrier crossing) channels is taken for H and H2.
    fn surface_expr(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        let syms = reac.symbols();
        let (re1, re2) = (&reac.reactants[0], &reac.reactants[1]);
        let (eb1, eb2) = (fnum(re1.binding_energy()?), fnum(re2.binding_energy()?));
        let (a1, a2) = (fnum(re1.massnumber), fnum(re2.massnumber));
        let a = fnum(reac.alpha);
        let gdens = &self.base.gdens;

        let afreq = format!("freq * sqrt({}/{})", eb1, a1);
        let adiff = format!("{} * exp(-{}*hop/{})/unisites", afreq, eb1, syms.tdust);
        let aquan = format!("{} * exp(quan * sqrt(hop*{}*{})) / unisites", afreq, a1, eb1);

        let bfreq = format!("freq * sqrt({}/{})", eb2, a2);
        let bdiff = format!("{} * exp(-{}*hop/{})/unisites", bfreq, eb2, syms.tdust);
        let bquan = format!("{} * exp(quan * sqrt(hop*{}*{})) / unisites", bfreq, a2, eb2);

        let kappa = exp_term(reac.alpha, syms.tdust);
        let kquan = format!(
            "exp(quan * sqrt((({}*{})/({}+{}))*{}))",
            a1, a2, a1, a2, a
        );

        let hopping = match (tunnels(re1), tunnels(re2)) {
            (true, true) => format!(
                "fmax({}, {}) * (fmax({}, {})+fmax({}, {}))",
                kappa, kquan, adiff, aquan, bdiff, bquan
            ),
            (true, false) => format!(
                "fmax({}, {}) * (fmax({}, {})+{})",
                kappa, kquan, adiff, aquan, bdiff
            ),
            (false, true) => format!(
                "fmax({}, {}) * ({}+fmax({}, {}))",
                kappa, kquan, adiff, bdiff, bquan
            ),
            (false, false) => format!("{} * ({}+{})", kappa, adiff, bdiff),
        };

        Ok(format!(
            "{} * pow((nMono*densites), 2.0) / {} * cov * cov",
            hopping, gdens
        ))
    }
}

impl GrainRates for Hh93Grain {
    fn model(&self) -> &'static str {
        "hh93"
    }

    fn rate_depletion(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainFreeze, "depletion", Some(1))?;
        Ok(self.base.depletion_expr(reac, Some("opt_frz")))
    }

    fn rate_thermal_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbThermal, "thermal desorption", Some(1))?;
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        Ok(format!(
            "opt_thd * cov * nMono * densites * sqrt(2.0*sites*kerg*eb_{alias}/(pi*pi*amu*{mass})) * exp(-eb_{alias}/({tdust}))",
            alias = spec.alias,
            mass = fnum(spec.massnumber),
            tdust = syms.tdust
        ))
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
        Ok(format!(
            "opt_crd * cov * duty * nMono * densites * ({cr}/{zism}) * sqrt(2.0*sites*kerg*eb_{alias}/(pi*pi*amu*{mass})) * exp(-eb_{alias}/Tcr)",
            cr = syms.crrate,
            zism = syms.zism,
            alias = spec.alias,
            mass = fnum(spec.massnumber)
        ))
    }

    fn rate_photon_desorption(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainDesorbPhoton, "photon desorption", Some(1))?;
        let syms = reac.symbols();
        let spec = &reac.reactants[0];
        let phot = format!(
            "{rad}*habing*exp(-{av}*3.02) + crphot * ({cr}/{zism})",
            rad = syms.radfield,
            av = syms.av,
            cr = syms.crrate,
            zism = syms.zism
        );
        Ok(format!(
            "opt_uvd * cov * ({}) * {} * nMono * garea",
            phot,
            fnum(spec.photon_yield(0.1))
        ))
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
        Ok(format!("opt_rcd * branch * {}", self.surface_expr(reac)?))
    }

    fn rate_surface_twobody(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::SurfaceTwobody, "surface two-body", Some(2))?;
        self.surface_expr(reac)
    }

    fn rate_electron_capture(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainECapture, "electron capture", None)?;
        let syms = reac.symbols();
        let rg = &self.base.rg;
        Ok(format!(
            "pi * {rg} * {rg} * sqrt(8.0*kerg*({tgas})/pi/amu/me)",
            rg = rg,
            tgas = syms.tgas
        ))
    }

    fn rate_recombination(&self, reac: &Reaction) -> Result<String, ChemNetError> {
        check_process(reac, ReactionType::GrainRecombine, "recombination", None)?;
        let spec = reac
            .reactants
            .iter()
            .find(|s| !s.is_grain)
            .ok_or_else(|| {
                ChemNetError::RateExpression(format!(
                    "recombination needs a non-grain reactant: \"{}\"",
                    reac
                ))
            })?;
        let syms = reac.symbols();
        let (rg, gdens) = (&self.base.rg, &self.base.gdens);
        Ok(format!(
            "{a} * pi * {rg} * {rg} * {gdens} * sqrt(8.0*kerg*{tgas}/(pi*amu*{mass})) * (1.0 + pow(echarge, 2.0)/{rg}/kerg/{tgas}) * (1.0 + sqrt(2.0*pow(echarge, 2.0)/({rg}*kerg*{tgas}+2.0*pow(echarge, 2.0))))",
            a = fnum(reac.alpha),
            rg = rg,
            gdens = gdens,
            tgas = syms.tgas,
            mass = fnum(spec.massnumber)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grains::{GrainModel, GrainRates};
    use crate::reactions::Format;
    use crate::species::ChemContext;

    fn reaction(rtype: ReactionType, reactants: &[&str], products: &[&str]) -> Reaction {
        let ctx = ChemContext::default();
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = reactants
            .iter()
            .map(|n| Species::parse(n, &ctx).unwrap())
            .collect();
        reac.products = products
            .iter()
            .map(|n| Species::parse(n, &ctx).unwrap())
            .collect();
        reac.alpha = 1.0;
        reac.reaction_type = rtype;
        reac
    }

    #[test]
    fn test_thermal_desorption() {
        let grain: GrainModel = Hh93Grain::default().into();
        let reac = reaction(ReactionType::GrainDesorbThermal, &["#CO"], &["CO"]);
        let rate = grain.rateexpr(&reac).unwrap();
        assert!(rate.starts_with("opt_thd * cov * nMono * densites"));
        assert!(rate.contains("sqrt(2.0*sites*kerg*eb_GCOI/(pi*pi*amu*28.0))"));
        assert!(rate.contains("exp(-eb_GCOI/(Tdust))"));
    }

    #[test]
    fn test_uclchem_uses_gas_temperature_for_dust() {
        let grain: GrainModel = Hh93Grain::default().into();
        let mut reac = reaction(ReactionType::GrainDesorbThermal, &["#CO"], &["CO"]);
        reac.format = Format::Uclchem;
        let rate = grain.rateexpr(&reac).unwrap();
        assert!(rate.contains("exp(-eb_GCOI/(Tgas))"));
    }

    #[test]
    fn test_surface_twobody_tunneling() {
        let grain: GrainModel = Hh93Grain::default().into();
        let reac = reaction(ReactionType::SurfaceTwobody, &["#H", "#CO"], &["#HCO"]);
        let rate = grain.rateexpr(&reac).unwrap();
        // the hydrogen channel takes the faster of thermal hopping and
        // tunneling, the CO channel only hops thermally
        assert!(rate.contains("fmax"));
        assert!(rate.contains("quan * sqrt(hop*1.0*600.0)"));
        assert!(rate.ends_with("* cov * cov"));
        // both heavy partners: no tunneling branch at all
        let reac = reaction(ReactionType::SurfaceTwobody, &["#CO", "#CO"], &["#CO2", "#C"]);
        let rate = grain.rateexpr(&reac).unwrap();
        assert!(!rate.contains("fmax"));
    }

    #[test]
    fn test_surface_twobody_needs_binding_energies() {
        let grain: GrainModel = Hh93Grain::default().into();
        // SiH has no tabulated partner entry for #SiH4
        let reac = reaction(ReactionType::SurfaceTwobody, &["#SiH4", "#CO"], &["#CO2"]);
        assert!(matches!(
            grain.rateexpr(&reac),
            Err(ChemNetError::MissingBindingEnergy(_))
        ));
    }

    #[test]
    fn test_photon_desorption_yield_override() {
        let mut ctx = ChemContext::default();
        ctx.photon_yield.insert("CO".to_string(), 3.0e-3);
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = vec![Species::parse("#CO", &ctx).unwrap()];
        reac.products = vec![Species::parse("CO", &ctx).unwrap()];
        reac.reaction_type = ReactionType::GrainDesorbPhoton;
        let grain: GrainModel = Hh93Grain::default().into();
        let rate = grain.rateexpr(&reac).unwrap();
        assert!(rate.contains("0.003"));
        assert!(rate.contains("G0*habing*exp(-Av*3.02)"));
    }

    #[test]
    fn test_reactive_desorption_branch() {
        let grain: GrainModel = Hh93Grain::default().into();
        let reac = reaction(ReactionType::GrainDesorbReactive, &["#H", "#CO"], &["HCO"]);
        let rate = grain.rateexpr(&reac).unwrap();
        assert!(rate.starts_with("opt_rcd * branch * "));
    }
}
