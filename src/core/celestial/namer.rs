//! Constellation Namer
//!
//! Draws display names without replacement from a finite list, using the
//! name random stream only. Copies placed in neighboring quadrants inherit
//! their parent's name and never consume one.
//!
//! # Name Sources
//!
//! 1. **Built-in**: the list shipped in `data/constellation_names.txt`
//! 2. **Custom**: any newline-delimited file named by `name_source`
//!
//! Lines are trimmed and blank lines are ignored in both cases.

use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use rand_chacha::ChaChaRng;
use tracing::{debug, info};

use super::constellation::Constellation;
use crate::core::error::{ChartError, Result, ResultExt};

const BUILTIN_NAMES: &str = include_str!("../../../data/constellation_names.txt");

// =============================================================================
// Constellation Namer
// =============================================================================

/// A pool of names, drawn without replacement
#[derive(Debug, Clone)]
pub struct ConstellationNamer {
    /// Every loaded name, in file order
    names: Vec<String>,
    /// Names not drawn yet
    available: Vec<String>,
}

impl Default for ConstellationNamer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ConstellationNamer {
    /// The built-in name list
    pub fn builtin() -> Self {
        Self::from_lines(BUILTIN_NAMES)
    }

    /// Parse a newline-delimited list
    pub fn from_lines(text: &str) -> Self {
        let names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self {
            available: names.clone(),
            names,
        }
    }

    /// Read a name list file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(ChartError::from)
            .context(format!("reading name list {}", path.display()))?;
        Ok(Self::from_lines(&text))
    }

    /// The custom list at `source`, or the built-in one
    pub fn load(source: Option<&Path>) -> Result<Self> {
        let namer = match source {
            Some(path) => {
                info!("Loading constellation names from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::builtin(),
        };
        debug!("{} constellation names available", namer.names.len());
        Ok(namer)
    }

    /// Draw one name without replacement
    pub fn draw(&mut self, rng: &mut ChaChaRng) -> Result<String> {
        if self.available.is_empty() {
            return Err(ChartError::exhausted(
                "name pool",
                format!("all {} names are in use", self.names.len()),
            ));
        }
        let index = rng.random_range(0..self.available.len());
        Ok(self.available.remove(index))
    }

    /// Names still available
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Name originals in list order, then give every copy its parent's name.
    pub fn name_all(&mut self, constellations: &mut [Constellation], rng: &mut ChaChaRng) -> Result<()> {
        let mut by_id: HashMap<String, String> = HashMap::new();
        for constellation in constellations.iter_mut().filter(|c| !c.is_copy()) {
            constellation.name = self.draw(rng)?;
            debug!("Constellation {} is {}", constellation.id, constellation.name);
            by_id.insert(constellation.id.clone(), constellation.name.clone());
        }

        for constellation in constellations.iter_mut().filter(|c| c.is_copy()) {
            let parent = constellation.parent_id.as_deref().unwrap_or_default();
            let name = by_id.get(parent).ok_or_else(|| {
                ChartError::graph_invariant(format!(
                    "copy {} refers to unknown constellation {}",
                    constellation.id, parent
                ))
            })?;
            constellation.name = name.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn original(id: &str) -> Constellation {
        Constellation {
            id: id.to_string(),
            ..Constellation::default()
        }
    }

    fn copy(id: &str, parent: &str) -> Constellation {
        Constellation {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            ..Constellation::default()
        }
    }

    #[test]
    fn test_builtin_list_is_large_and_clean() {
        let namer = ConstellationNamer::builtin();
        assert!(namer.remaining() >= 100);
        assert!(namer.names.iter().all(|n| !n.is_empty() && n.trim() == n));
    }

    #[test]
    fn test_from_lines_trims_and_skips_blanks() {
        let namer = ConstellationNamer::from_lines("  Lyre \n\n Wolf\n\t\nCrane");
        assert_eq!(namer.names, vec!["Lyre", "Wolf", "Crane"]);
    }

    #[test]
    fn test_draws_without_replacement() {
        let mut namer = ConstellationNamer::from_lines("A\nB\nC");
        let mut rng = ChaChaRng::seed_from_u64(8);
        let drawn: HashSet<String> = (0..3).map(|_| namer.draw(&mut rng).unwrap()).collect();
        assert_eq!(drawn.len(), 3);

        let err = namer.draw(&mut rng).unwrap_err();
        assert!(matches!(err, ChartError::ResourceExhaustion { resource: "name pool", .. }));
        assert_eq!(namer.remaining(), 0);
    }

    #[test]
    fn test_copies_inherit_parent_name() {
        let mut namer = ConstellationNamer::from_lines("A\nB\nC\nD");
        let mut rng = ChaChaRng::seed_from_u64(1);
        let mut constellations = vec![original("0"), original("1"), copy("0.1", "0"), copy("1.1", "1")];

        namer.name_all(&mut constellations, &mut rng).unwrap();
        assert_eq!(namer.remaining(), 2);
        assert_ne!(constellations[0].name, constellations[1].name);
        assert_eq!(constellations[2].name, constellations[0].name);
        assert_eq!(constellations[3].name, constellations[1].name);
    }

    #[test]
    fn test_same_seed_same_names() {
        let names = |seed| {
            let mut namer = ConstellationNamer::builtin();
            let mut rng = ChaChaRng::seed_from_u64(seed);
            (0..5).map(|_| namer.draw(&mut rng).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(names(77), names(77));
    }

    #[test]
    fn test_too_few_names_is_fatal() {
        let mut namer = ConstellationNamer::from_lines("Only");
        let mut rng = ChaChaRng::seed_from_u64(1);
        let mut constellations = vec![original("0"), original("1")];
        assert!(namer.name_all(&mut constellations, &mut rng).is_err());
    }

    #[test]
    fn test_load_custom_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Heron\nLantern\n").unwrap();
        let namer = ConstellationNamer::load(Some(file.path())).unwrap();
        assert_eq!(namer.remaining(), 2);

        let missing = ConstellationNamer::load(Some(Path::new("/nonexistent/names.txt")));
        assert!(missing.is_err());
    }
}
