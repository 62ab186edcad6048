//! Chart Engine - Main orchestration for skychart
//!
//! The ChartEngine is the primary interface for generating charts.
//! It coordinates star-field generation, constellation construction,
//! replication, naming and serialization.
//!
//! Every run owns a [`GenerationContext`]: the three random streams and the
//! constellation id counter live there and nowhere else, so two runs with
//! the same seeds in one process produce identical charts.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::info;

use crate::core::celestial::{
    replicate, AlgorithmKind, CandidatePool, Constellation, ConstellationNamer, ConstellationPlan,
};
use crate::core::error::Result;
use crate::core::models::{ChartConfig, ConstellationConfig, Seeds};
use crate::core::serialization::{get_serializer, ChartFormat, ChartSerializer};
use crate::core::sky::{generate_field, SkyField};

// =============================================================================
// Generation Context
// =============================================================================

/// Per-run random streams and counters
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub seeds: Seeds,
    /// Star geometry, size and color
    pub star_rng: ChaChaRng,
    /// Constellation plan and construction
    pub constellation_rng: ChaChaRng,
    /// Name drawing
    pub name_rng: ChaChaRng,
    next_constellation: usize,
}

impl GenerationContext {
    pub fn new(seeds: Seeds) -> Self {
        Self {
            seeds,
            star_rng: ChaChaRng::seed_from_u64(seeds.star),
            constellation_rng: ChaChaRng::seed_from_u64(seeds.constellation),
            name_rng: ChaChaRng::seed_from_u64(seeds.name),
            next_constellation: 0,
        }
    }

    /// Next original constellation id: `"0"`, `"1"`, ...
    pub fn next_constellation_id(&mut self) -> String {
        let id = self.next_constellation.to_string();
        self.next_constellation += 1;
        id
    }
}

// =============================================================================
// Sky Chart
// =============================================================================

/// The result of one generation run
#[derive(Debug, Clone)]
pub struct SkyChart {
    pub field: SkyField,
    /// Originals in construction order, followed by their copies
    pub constellations: Vec<Constellation>,
    pub seeds: Seeds,
    /// `None` when constellations are disabled
    pub algorithm: Option<AlgorithmKind>,
}

impl SkyChart {
    /// Constellations built by the algorithm
    pub fn originals(&self) -> impl Iterator<Item = &Constellation> + '_ {
        self.constellations.iter().filter(|c| !c.is_copy())
    }

    /// Quadrant copies
    pub fn copies(&self) -> impl Iterator<Item = &Constellation> + '_ {
        self.constellations.iter().filter(|c| c.is_copy())
    }

    pub fn constellation(&self, id: &str) -> Option<&Constellation> {
        self.constellations.iter().find(|c| c.id == id)
    }
}

// =============================================================================
// Chart Engine
// =============================================================================

/// The main chart generation engine
pub struct ChartEngine {
    /// Validated configuration
    config: ChartConfig,
    /// Output serializer
    serializer: Box<dyn ChartSerializer>,
}

impl ChartEngine {
    /// Create an engine, validating `config` first
    pub fn new(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            serializer: get_serializer(ChartFormat::default()),
        })
    }

    /// Builder: set output format
    pub fn with_format(mut self, format: ChartFormat) -> Self {
        self.serializer = get_serializer(format);
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Generate a chart, drawing fresh seeds for any the config leaves open
    pub fn generate(&self) -> Result<SkyChart> {
        self.generate_with_seeds(Seeds::resolve(&self.config))
    }

    /// Generate a chart from explicit seeds
    pub fn generate_with_seeds(&self, seeds: Seeds) -> Result<SkyChart> {
        let mut ctx = GenerationContext::new(seeds);
        let mut field = generate_field(&self.config, &mut ctx.star_rng)?;

        let (constellations, algorithm) = if self.config.constellations.enabled {
            let algorithm = self.config.constellations.algorithm()?;
            let constellations = build_constellations(&mut field, &self.config.constellations, &mut ctx)?;
            (constellations, Some(algorithm))
        } else {
            info!("Constellations disabled");
            (Vec::new(), None)
        };

        Ok(SkyChart {
            field,
            constellations,
            seeds,
            algorithm,
        })
    }

    /// Serialize a chart with the configured format
    pub fn render(&self, chart: &SkyChart) -> Result<String> {
        self.serializer.serialize(chart)
    }

    /// File extension of the configured format
    pub fn extension(&self) -> &'static str {
        self.serializer.extension()
    }
}

/// Run one constellation pass over `field`.
///
/// Clears earlier claims, draws the plan, runs the configured algorithm,
/// numbers the results, adds quadrant copies and names everything.
pub fn build_constellations(
    field: &mut SkyField,
    config: &ConstellationConfig,
    ctx: &mut GenerationContext,
) -> Result<Vec<Constellation>> {
    field.reset_claims();
    let algorithm = config.algorithm()?;
    let mut namer = ConstellationNamer::load(config.name_source.as_deref())?;
    info!("Using the {} constellation algorithm", algorithm);

    let plan = ConstellationPlan::draw(
        config.count_range,
        config.star_count_range,
        &mut ctx.constellation_rng,
    );
    let pool = CandidatePool::select(field, plan.total());
    info!(
        "Planned {} constellations over {} candidate masters",
        plan.targets.len(),
        pool.masters().len()
    );

    let mut constellations = algorithm.build(field, &pool, &plan, ctx)?;
    for constellation in &mut constellations {
        constellation.id = ctx.next_constellation_id();
    }

    let copies = replicate(field, &constellations)?;
    info!(
        "Built {} constellations and {} copies",
        constellations.len(),
        copies.len()
    );
    constellations.extend(copies);

    namer.name_all(&mut constellations, &mut ctx.name_rng)?;
    Ok(constellations)
}
