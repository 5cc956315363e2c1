use std::collections::HashMap;

use anyhow::Context;
use thiserror::Error;
use tracing::info;

/// Default Monte-Carlo draw count for the hyper-parameter marginalisation.
pub const DEFAULT_NUM_DISTRIBUTION_DRAWS: u64 = 200;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The selection matched no lens records. An empty catalog is a fatal
    /// configuration error, raised at initialization and never deferred to
    /// the first evaluation.
    #[error("no lens data loaded: selection matched no subsample")]
    Empty,
    #[error("unknown subsample `{0}`")]
    UnknownSubsample(String),
    #[error("number of distribution draws must be positive")]
    ZeroDraws,
}

/// One lens likelihood configuration from the preprocessing pipeline.
///
/// The payload `C` is opaque to this crate (velocity dispersion and
/// time-delay measurements, priors, model identifiers); the catalog only
/// stamps the shared Monte-Carlo draw count onto it.
#[derive(Debug, Clone)]
pub struct LensRecord<C> {
    pub config: C,
    /// Number of Monte-Carlo draws used to marginalise the hyper-parameter
    /// distributions for this lens. Identical for every record of an
    /// assembled catalog.
    pub num_distribution_draws: u64,
}

impl<C> LensRecord<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            num_distribution_draws: DEFAULT_NUM_DISTRIBUTION_DRAWS,
        }
    }
}

/// Source of preprocessed lens subsamples, implemented by the host's
/// data-loading layer. The on-disk encoding is the host's business; this
/// crate only needs each subsample as a list of records.
pub trait SubsampleSource {
    type Config;

    /// Deserialize the named subsample.
    fn load(&mut self, name: &str) -> anyhow::Result<Vec<LensRecord<Self::Config>>>;
}

/// The fixed, loaded-once lens sample the likelihood runs over.
///
/// Assembled exactly once during initialization from zero or more named
/// subsamples and read-only afterwards; evaluations across sampler chains
/// may share it freely.
#[derive(Debug, Clone)]
pub struct LensCatalog<C> {
    lenses: Vec<LensRecord<C>>,
}

impl<C> LensCatalog<C> {
    /// Concatenate the selected subsamples, in selection order, stamping
    /// `num_distribution_draws = draws` on every record.
    pub fn build<S: AsRef<str>>(
        selection: &[S],
        draws: u64,
        mut subsamples: HashMap<String, Vec<LensRecord<C>>>,
    ) -> Result<Self, CatalogError> {
        if draws == 0 {
            return Err(CatalogError::ZeroDraws);
        }
        let mut lenses = Vec::new();
        for name in selection {
            let name = name.as_ref();
            let mut records = subsamples
                .remove(name)
                .ok_or_else(|| CatalogError::UnknownSubsample(name.to_string()))?;
            for record in &mut records {
                record.num_distribution_draws = draws;
            }
            lenses.append(&mut records);
        }
        if lenses.is_empty() {
            return Err(CatalogError::Empty);
        }
        info!(
            lenses = lenses.len(),
            num_distribution_draws = draws,
            "assembled lens catalog"
        );
        Ok(Self { lenses })
    }

    /// Pull each selected subsample from `source`, then [`build`](Self::build).
    pub fn assemble<S, L>(selection: &[S], draws: u64, source: &mut L) -> anyhow::Result<Self>
    where
        S: AsRef<str>,
        L: SubsampleSource<Config = C>,
    {
        let mut subsamples = HashMap::new();
        for name in selection {
            let name = name.as_ref();
            let records = source
                .load(name)
                .with_context(|| format!("failed to load lens subsample `{name}`"))?;
            subsamples.insert(name.to_string(), records);
        }
        Ok(Self::build(selection, draws, subsamples)?)
    }

    pub fn lenses(&self) -> &[LensRecord<C>] {
        &self.lenses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LensRecord<C>> {
        self.lenses.iter()
    }

    pub fn len(&self) -> usize {
        self.lenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lenses.is_empty()
    }

    /// The draw count shared by every record of the catalog.
    pub fn num_distribution_draws(&self) -> u64 {
        self.lenses[0].num_distribution_draws
    }
}

impl<'a, C> IntoIterator for &'a LensCatalog<C> {
    type Item = &'a LensRecord<C>;
    type IntoIter = std::slice::Iter<'a, LensRecord<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lenses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn subsample(tag: usize, len: usize) -> Vec<LensRecord<(usize, usize)>> {
        (0..len).map(|idx| LensRecord::new((tag, idx))).collect()
    }

    #[test]
    fn concatenates_in_selection_order() {
        let mut subsamples = HashMap::new();
        subsamples.insert("time-delay".to_string(), subsample(0, 7));
        subsamples.insert("spectroscopy".to_string(), subsample(1, 33));

        let catalog =
            LensCatalog::build(&["spectroscopy", "time-delay"], 150, subsamples).unwrap();
        assert_eq!(catalog.len(), 40);
        assert_eq!(catalog.lenses()[0].config, (1, 0));
        assert_eq!(catalog.lenses()[33].config, (0, 0));
        assert!(catalog.iter().all(|r| r.num_distribution_draws == 150));
        assert_eq!(catalog.num_distribution_draws(), 150);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let subsamples: HashMap<String, Vec<LensRecord<()>>> = HashMap::new();
        let selection: [&str; 0] = [];
        let result = LensCatalog::build(&selection, 200, subsamples);
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn selected_but_empty_subsamples_are_rejected() {
        let mut subsamples = HashMap::new();
        subsamples.insert("ifu".to_string(), subsample(0, 0));
        let result = LensCatalog::build(&["ifu"], 200, subsamples);
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn unknown_subsample_is_rejected() {
        let mut subsamples = HashMap::new();
        subsamples.insert("ifu".to_string(), subsample(0, 5));
        let result = LensCatalog::build(&["ifu", "missing"], 200, subsamples);
        match result {
            Err(CatalogError::UnknownSubsample(name)) => assert_eq!(name, "missing"),
            other => panic!("expected UnknownSubsample, got {other:?}"),
        }
    }

    #[test]
    fn zero_draws_are_rejected() {
        let mut subsamples = HashMap::new();
        subsamples.insert("ifu".to_string(), subsample(0, 5));
        let result = LensCatalog::build(&["ifu"], 0, subsamples);
        assert!(matches!(result, Err(CatalogError::ZeroDraws)));
    }

    #[test]
    fn assemble_pulls_from_source() {
        struct MapSource(HashMap<String, Vec<LensRecord<(usize, usize)>>>);

        impl SubsampleSource for MapSource {
            type Config = (usize, usize);

            fn load(&mut self, name: &str) -> anyhow::Result<Vec<LensRecord<(usize, usize)>>> {
                self.0
                    .get(name)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no such subsample"))
            }
        }

        let mut store = HashMap::new();
        store.insert("time-delay".to_string(), subsample(0, 7));
        let mut source = MapSource(store);

        let catalog = LensCatalog::assemble(&["time-delay"], 200, &mut source).unwrap();
        assert_eq!(catalog.len(), 7);

        let err = LensCatalog::assemble(&["absent"], 200, &mut source).unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    proptest! {
        #[test]
        fn assembly_is_deterministic(
            sizes in proptest::collection::vec(0usize..12, 1..4),
            draws in 1u64..5000,
        ) {
            let mut subsamples = HashMap::new();
            let mut names = Vec::new();
            for (tag, &len) in sizes.iter().enumerate() {
                let name = format!("sample-{tag}");
                subsamples.insert(name.clone(), subsample(tag, len));
                names.push(name);
            }

            let total: usize = sizes.iter().sum();
            let result = LensCatalog::build(&names, draws, subsamples);
            if total == 0 {
                prop_assert!(matches!(result, Err(CatalogError::Empty)));
            } else {
                let catalog = result.unwrap();
                prop_assert_eq!(catalog.len(), total);
                prop_assert!(catalog.iter().all(|r| r.num_distribution_draws == draws));
                let expected: Vec<(usize, usize)> = sizes
                    .iter()
                    .enumerate()
                    .flat_map(|(tag, &len)| (0..len).map(move |idx| (tag, idx)))
                    .collect();
                let got: Vec<(usize, usize)> = catalog.iter().map(|r| r.config).collect();
                prop_assert_eq!(got, expected);
            }
        }
    }
}
