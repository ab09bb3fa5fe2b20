//! The reaction network: an insertion-ordered reaction list together with
//! the derived species bookkeeping the code generator needs. Reactions are
//! appended from strings or files in any supported database format;
//! duplicates are allowed at this layer and reported by
//! [`Network::check_duplicate_reaction`].
use crate::error::ChemNetError;
use crate::reactions::{Format, FormatParser, Reaction, RecordParser};
use crate::species::{is_electron_name, ChemContext, Species};
use crate::thermal::{self, ThermalProcess};
use log::{info, warn};
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Which side of a reaction a species query matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesRole {
    Reactant,
    Product,
    Any,
}

#[derive(Debug, Clone)]
pub struct Network {
    ctx: ChemContext,
    reactions: Vec<Reaction>,
    /// Database formats that contributed at least one reaction.
    formats: BTreeSet<Format>,
    reactants_in_network: HashSet<Species>,
    products_in_network: HashSet<Species>,
    /// First-seen ordering over the union of reactants and products. The
    /// hash sets answer membership; every caller-visible ordering comes
    /// from this list so results stay deterministic.
    species_order: Vec<Species>,
}

impl Network {
    /// An empty network over a validated parsing context.
    pub fn new(ctx: ChemContext) -> Result<Network, ChemNetError> {
        ctx.check()?;
        Ok(Network {
            ctx,
            reactions: Vec::new(),
            formats: BTreeSet::new(),
            reactants_in_network: HashSet::new(),
            products_in_network: HashSet::new(),
            species_order: Vec::new(),
        })
    }

    pub fn context(&self) -> &ChemContext {
        &self.ctx
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Distinct species in first-seen order, reactants of a reaction before
    /// its products.
    pub fn species(&self) -> &[Species] {
        &self.species_order
    }

    pub fn n_species(&self) -> usize {
        self.species_order.len()
    }

    pub fn formats(&self) -> &BTreeSet<Format> {
        &self.formats
    }

    pub fn add_reaction(&mut self, reaction: Reaction) {
        self.formats.insert(reaction.format);
        for sp in &reaction.reactants {
            if !self.species_order.contains(sp) {
                self.species_order.push(sp.clone());
            }
            self.reactants_in_network.insert(sp.clone());
        }
        for sp in &reaction.products {
            if !self.species_order.contains(sp) {
                self.species_order.push(sp.clone());
            }
            self.products_in_network.insert(sp.clone());
        }
        self.reactions.push(reaction);
    }

    /// Parse one record and append it. Records that contain only pseudo
    /// species parse to an empty reaction and are skipped with a warning.
    pub fn add_record(&mut self, record: &str, format: Format) -> Result<(), ChemNetError> {
        let mut parser = FormatParser::new(format);
        if let Some(reac) = parser.parse_line(record, &self.ctx)? {
            if reac.is_empty() {
                warn!("skipping empty reaction record: {}", record.trim());
            } else {
                self.add_reaction(reac);
            }
        }
        Ok(())
    }

    /// Append every record of a multi-line string. The parser lives for the
    /// whole text so stateful formats (KROME directives) work.
    pub fn add_reactions_from_str(
        &mut self,
        text: &str,
        format: Format,
    ) -> Result<(), ChemNetError> {
        let mut parser = FormatParser::new(format);
        for line in text.lines() {
            if let Some(reac) = parser.parse_line(line, &self.ctx)? {
                if reac.is_empty() {
                    warn!("skipping empty reaction record: {}", line.trim());
                } else {
                    self.add_reaction(reac);
                }
            }
        }
        Ok(())
    }

    /// Read a whole reaction file in the given format.
    pub fn load_reaction_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: Format,
    ) -> Result<(), ChemNetError> {
        let path = path.as_ref();
        let before = self.reactions.len();
        let file = File::open(path)?;
        let mut parser = FormatParser::new(format);
        for line in BufReader::new(file).lines() {
            let line = line?;
            if let Some(reac) = parser.parse_line(&line, &self.ctx)? {
                if reac.is_empty() {
                    warn!("skipping empty reaction record: {}", line.trim());
                } else {
                    self.add_reaction(reac);
                }
            }
        }
        info!(
            "loaded {} {} reactions from {}",
            self.reactions.len() - before,
            format,
            path.display()
        );
        Ok(())
    }

    /// Indices of reactions the given species participates in. Electron
    /// spellings collapse, so "E" and "e-" query the same species.
    pub fn where_species(&self, name: &str, role: SpeciesRole) -> Vec<usize> {
        let want_electron = is_electron_name(name);
        let hit = |s: &Species| {
            if want_electron {
                s.is_electron()
            } else {
                s.name == name
            }
        };
        self.reactions
            .iter()
            .enumerate()
            .filter(|(_, reac)| {
                let in_reac = reac.reactants.iter().any(|s| hit(s));
                let in_prod = reac.products.iter().any(|s| hit(s));
                match role {
                    SpeciesRole::Reactant => in_reac,
                    SpeciesRole::Product => in_prod,
                    SpeciesRole::Any => in_reac || in_prod,
                }
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of reactions equal to the given one (chemical content and
    /// temperature range; provenance ignored).
    pub fn where_reaction(&self, reaction: &Reaction) -> Vec<usize> {
        self.reactions
            .iter()
            .enumerate()
            .filter(|(_, reac)| *reac == reaction)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of redundant reactions: for every group of equal reactions
    /// the first occurrence is kept out of the result and each later copy
    /// is reported once. `full_check` compares structurally; the cheap mode
    /// hashes the provenance-free [`Reaction::dedup_key`] strings instead.
    pub fn check_duplicate_reaction(&self, full_check: bool) -> Vec<usize> {
        let mut dupes = Vec::new();
        if full_check {
            let mut seen: Vec<&Reaction> = Vec::new();
            for (idx, reac) in self.reactions.iter().enumerate() {
                if seen.iter().any(|s| *s == reac) {
                    dupes.push(idx);
                } else {
                    seen.push(reac);
                }
            }
        } else {
            let mut seen = HashSet::new();
            for (idx, reac) in self.reactions.iter().enumerate() {
                if !seen.insert(reac.dedup_key()) {
                    dupes.push(idx);
                }
            }
        }
        if !dupes.is_empty() {
            info!(
                "found {} duplicate reactions:\n{}",
                dupes.len(),
                dupes
                    .iter()
                    .map(|&i| self.reactions[i].to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }
        dupes
    }

    /// Diagnostic over the open ends of the network: species that are
    /// produced but never consumed are sources, species that are consumed
    /// but never produced are sinks. Both lists follow the first-seen
    /// species order.
    pub fn find_source_sink(&self) -> (Vec<String>, Vec<String>) {
        let mut sources = Vec::new();
        let mut sinks = Vec::new();
        for sp in &self.species_order {
            let consumed = self.reactants_in_network.contains(sp);
            let produced = self.products_in_network.contains(sp);
            if produced && !consumed {
                sources.push(sp.name.clone());
            } else if consumed && !produced {
                sinks.push(sp.name.clone());
            }
        }
        if sources.is_empty() && sinks.is_empty() {
            info!("found no source or sink species");
        } else {
            info!("found sources: {:?}, sinks: {:?}", sources, sinks);
        }
        (sources, sinks)
    }

    /// Cooling processes whose driving species are all present in the
    /// network, keyed by their short label.
    pub fn allowed_cooling(&self) -> Result<Vec<(String, ThermalProcess)>, ChemNetError> {
        thermal::allowed_cooling(&self.species_order, &self.ctx)
    }

    /// Heating counterpart of [`Network::allowed_cooling`].
    pub fn allowed_heating(&self) -> Result<Vec<(String, ThermalProcess)>, ChemNetError> {
        thermal::allowed_heating(&self.species_order, &self.ctx)
    }

    /// Remove reactions by index and rebuild every derived collection.
    /// Unknown and repeated indices are ignored.
    pub fn remove_reaction(&mut self, indices: &[usize]) {
        let drop: HashSet<usize> = indices.iter().copied().collect();
        let kept: Vec<Reaction> = self
            .reactions
            .drain(..)
            .enumerate()
            .filter(|(i, _)| !drop.contains(i))
            .map(|(_, r)| r)
            .collect();
        self.formats.clear();
        self.reactants_in_network.clear();
        self.products_in_network.clear();
        self.species_order.clear();
        for reac in kept {
            self.add_reaction(reac);
        }
    }

    /// Renumber the file indices with the joining order, for databases
    /// that carried none or after structural edits.
    pub fn reindex(&mut self) {
        for (idx, reac) in self.reactions.iter_mut().enumerate() {
            reac.idxfromfile = idx as i64 + 1;
        }
    }

    /// Element-composition matrix: one row per species in network order,
    /// one column per element, entries the atom counts. Used to verify
    /// elemental conservation of the assembled system.
    pub fn element_composition_matrix(&self) -> (DMatrix<f64>, Vec<String>) {
        let mut elements: Vec<String> = Vec::new();
        for sp in &self.species_order {
            for elem in sp.element_count.keys() {
                if !elements.contains(elem) {
                    elements.push(elem.clone());
                }
            }
        }
        let mut matrix = DMatrix::zeros(self.species_order.len(), elements.len());
        for (i, sp) in self.species_order.iter().enumerate() {
            for (j, elem) in elements.iter().enumerate() {
                if let Some(count) = sp.element_count.get(elem) {
                    matrix[(i, j)] = *count as f64;
                }
            }
        }
        (matrix, elements)
    }

    /// Human-readable reaction listing.
    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("index"),
            Cell::new("reactants"),
            Cell::new("products"),
            Cell::new("alpha"),
            Cell::new("beta"),
            Cell::new("gamma"),
            Cell::new("Tmin"),
            Cell::new("Tmax"),
            Cell::new("type"),
            Cell::new("format"),
        ]));
        for (idx, reac) in self.reactions.iter().enumerate() {
            let reactants = reac
                .reactants
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" + ");
            let products = reac
                .products
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" + ");
            table.add_row(Row::new(vec![
                Cell::new(&idx.to_string()),
                Cell::new(&reactants),
                Cell::new(&products),
                Cell::new(&format!("{:.3e}", reac.alpha)),
                Cell::new(&format!("{:.3e}", reac.beta)),
                Cell::new(&format!("{:.3e}", reac.gamma)),
                Cell::new(&format!("{:.1}", reac.temp_min)),
                Cell::new(&format!("{:.1}", reac.temp_max)),
                Cell::new(&reac.reaction_type.to_string()),
                Cell::new(&reac.format.to_string()),
            ]));
        }
        table.printstd();
    }

    /// Dump the reaction list as JSON.
    pub fn to_json(&self) -> Result<String, ChemNetError> {
        Ok(serde_json::to_string_pretty(&self.reactions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactiontype::ReactionType;
    use std::io::Write;

    const UMIST_LINES: &str = "\
1:NN:H2:OH:H2O:H::::1:2.05e-12:1.52:1736:250:2581:::M:
2:CP:H2:::H2+:e-:::1:9.3e-01:0:0:10:41000:::M:
3:NN:H2:OH:H2O:H::::1:2.05e-12:1.52:1736:250:2581:::M:";

    fn umist_network() -> Network {
        let mut net = Network::new(ChemContext::default()).unwrap();
        net.add_reactions_from_str(UMIST_LINES, Format::Umist).unwrap();
        net
    }

    #[test]
    fn test_species_bookkeeping_is_first_seen_ordered() {
        let net = umist_network();
        assert_eq!(net.n_reactions(), 3);
        let names: Vec<&str> = net.species().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["H2", "OH", "H2O", "H", "H2+", "e-"]);
    }

    #[test]
    fn test_where_species() {
        let net = umist_network();
        assert_eq!(net.where_species("H2", SpeciesRole::Reactant), vec![0, 1, 2]);
        assert_eq!(net.where_species("H2O", SpeciesRole::Product), vec![0, 2]);
        assert_eq!(net.where_species("H2O", SpeciesRole::Reactant), Vec::<usize>::new());
        assert_eq!(net.where_species("e-", SpeciesRole::Any), vec![1]);
    }

    #[test]
    fn test_duplicate_detection_is_idempotent() {
        let net = umist_network();
        let dupes = net.check_duplicate_reaction(true);
        assert_eq!(dupes, vec![2]);
        assert_eq!(net.check_duplicate_reaction(true), dupes);
        assert_eq!(net.check_duplicate_reaction(false), dupes);
    }

    #[test]
    fn test_cheap_duplicate_check_ignores_file_index() {
        // the same record under two different file indices
        let mut net = Network::new(ChemContext::default()).unwrap();
        net.add_record("1:NN:H2:OH:H2O:H::::1:2.05e-12:1.52:1736:250:2581:::M:", Format::Umist)
            .unwrap();
        net.add_record("3:NN:H2:OH:H2O:H::::1:2.05e-12:1.52:1736:250:2581:::M:", Format::Umist)
            .unwrap();
        assert_eq!(net.check_duplicate_reaction(true), vec![1]);
        assert_eq!(net.check_duplicate_reaction(false), vec![1]);
    }

    #[test]
    fn test_where_species_collapses_electron_spellings() {
        let net = umist_network();
        assert_eq!(net.where_species("E", SpeciesRole::Any), vec![1]);
        assert_eq!(net.where_species("e", SpeciesRole::Product), vec![1]);
    }

    #[test]
    fn test_allowed_thermal_processes_follow_network_species() {
        let ctx = ChemContext::default();
        let mut net = Network::new(ctx.clone()).unwrap();
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = vec![
            Species::parse("H+", &ctx).unwrap(),
            Species::parse("e-", &ctx).unwrap(),
        ];
        reac.products = vec![Species::parse("H", &ctx).unwrap()];
        reac.reaction_type = ReactionType::GasTwobody;
        net.add_reaction(reac);
        let cooling = net.allowed_cooling().unwrap();
        let names: Vec<&str> = cooling.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["CIC_HI", "RC_HII", "CEC_HI"]);
        assert!(net.allowed_heating().unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_reindex() {
        let mut net = umist_network();
        net.remove_reaction(&[2]);
        assert_eq!(net.n_reactions(), 2);
        assert!(net.check_duplicate_reaction(true).is_empty());
        net.reindex();
        assert_eq!(net.reactions()[0].idxfromfile, 1);
        assert_eq!(net.reactions()[1].idxfromfile, 2);
        // derived sets were rebuilt from the surviving reactions
        let names: Vec<&str> = net.species().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["H2", "OH", "H2O", "H", "H2+", "e-"]);
    }

    #[test]
    fn test_source_sink_diagnostic() {
        let mut net = Network::new(ChemContext::default()).unwrap();
        net.add_record("1:NN:H2:OH:H2O:H::::1:1e-10:0:0:10:300:::M:", Format::Umist)
            .unwrap();
        let (sources, sinks) = net.find_source_sink();
        assert_eq!(sources, vec!["H2O", "H"]);
        assert_eq!(sinks, vec!["H2", "OH"]);
    }

    #[test]
    fn test_where_reaction_matches_across_formats() {
        let net = umist_network();
        let mut query = net.reactions()[0].clone();
        query.format = Format::Kida;
        query.idxfromfile = 99;
        query.reaction_type = ReactionType::Unknown;
        assert_eq!(net.where_reaction(&query), vec![0, 2]);
    }

    #[test]
    fn test_element_composition_matrix() {
        let mut net = Network::new(ChemContext::default()).unwrap();
        net.add_record("1:NN:H2:OH:H2O:H::::1:1e-10:0:0:10:300:::M:", Format::Umist)
            .unwrap();
        let (matrix, elements) = net.element_composition_matrix();
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(elements, vec!["H", "O"]);
        let h = 0;
        let o = 1;
        // row order follows the species order H2, OH, H2O, H
        assert_eq!(matrix[(0, h)], 2.0);
        assert_eq!(matrix[(1, o)], 1.0);
        assert_eq!(matrix[(2, h)], 2.0);
        assert_eq!(matrix[(2, o)], 1.0);
        assert_eq!(matrix[(3, h)], 1.0);
        // every column balances across the reaction
        for j in 0..elements.len() {
            let consumed = matrix[(0, j)] + matrix[(1, j)];
            let produced = matrix[(2, j)] + matrix[(3, j)];
            assert_eq!(consumed, produced);
        }
    }

    #[test]
    fn test_load_reaction_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", UMIST_LINES).unwrap();
        let mut net = Network::new(ChemContext::default()).unwrap();
        net.load_reaction_file(file.path(), Format::Umist).unwrap();
        assert_eq!(net.n_reactions(), 3);
    }

    #[test]
    fn test_json_dump() {
        let net = umist_network();
        let json = net.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }
}
