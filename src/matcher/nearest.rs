//! Nearest reference candidates for every predicted junction.
//!
//! Every reference junction sharing chromosome and strand with a predicted
//! junction on both sides is a candidate, with no distance bound. The best
//! candidates are those minimizing donor and acceptor distance at the same
//! time; when no candidate does both, the ones with the smallest summed
//! distance win. Ties are kept as a list.

use ahash::AHashMap;
use rayon::prelude::*;

use crate::types::{Junction, MatchCandidate, Strand};

/// A candidate together with its best-set flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub candidate: MatchCandidate,
    pub best: bool,
}

/// Outcome of ranking one predicted junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ranking {
    /// No reference junction shares both loci.
    NoCandidate,
    /// All candidates in reference order.
    Candidates(Vec<RankedCandidate>),
}

/// Ranking of one predicted junction against the reference set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRanking {
    pub pred_id: String,
    pub ranking: Ranking,
}

impl PredictionRanking {
    pub fn has_candidates(&self) -> bool {
        matches!(self.ranking, Ranking::Candidates(_))
    }

    /// Candidates flagged as best.
    pub fn best(&self) -> impl Iterator<Item = &MatchCandidate> {
        let candidates: &[RankedCandidate] = match &self.ranking {
            Ranking::Candidates(c) => c.as_slice(),
            Ranking::NoCandidate => &[],
        };
        candidates.iter().filter(|c| c.best).map(|c| &c.candidate)
    }

    /// First best candidate with the smallest summed distance.
    pub fn best_candidate(&self) -> Option<&MatchCandidate> {
        self.best().fold(None, |acc: Option<&MatchCandidate>, c| match acc {
            Some(a) if a.sum_distance <= c.sum_distance => Some(a),
            _ => Some(c),
        })
    }
}

/// Flag the best candidates.
///
/// Candidates reaching both the minimum donor and the minimum acceptor
/// distance win; otherwise every candidate at the minimum summed distance.
pub fn select_best(candidates: &[MatchCandidate]) -> Vec<bool> {
    let (Some(min_donor), Some(min_acceptor)) = (
        candidates.iter().map(|c| c.donor_distance).min(),
        candidates.iter().map(|c| c.acceptor_distance).min(),
    ) else {
        return Vec::new();
    };

    let both: Vec<bool> = candidates
        .iter()
        .map(|c| c.donor_distance == min_donor && c.acceptor_distance == min_acceptor)
        .collect();
    if both.iter().any(|&b| b) {
        return both;
    }

    let min_sum = candidates
        .iter()
        .map(|c| c.sum_distance)
        .min()
        .unwrap_or_default();
    candidates
        .iter()
        .map(|c| c.sum_distance == min_sum)
        .collect()
}

type LocusKey<'a> = (&'a str, Strand, &'a str, Strand);

fn locus_key(j: &Junction) -> LocusKey<'_> {
    (
        j.donor.chrom.as_str(),
        j.donor.strand,
        j.acceptor.chrom.as_str(),
        j.acceptor.strand,
    )
}

fn rank_one<'a>(
    pred: &'a Junction,
    loci: &AHashMap<LocusKey<'a>, Vec<&'a Junction>>,
) -> PredictionRanking {
    let Some(refs) = loci.get(&locus_key(pred)) else {
        return PredictionRanking {
            pred_id: pred.id.clone(),
            ranking: Ranking::NoCandidate,
        };
    };

    let candidates: Vec<MatchCandidate> = refs
        .iter()
        .filter_map(|r| {
            Some(MatchCandidate::new(
                r.id.clone(),
                pred.id.clone(),
                pred.donor.distance(&r.donor)?,
                pred.acceptor.distance(&r.acceptor)?,
            ))
        })
        .collect();
    let best = select_best(&candidates);

    PredictionRanking {
        pred_id: pred.id.clone(),
        ranking: Ranking::Candidates(
            candidates
                .into_iter()
                .zip(best)
                .map(|(candidate, best)| RankedCandidate { candidate, best })
                .collect(),
        ),
    }
}

/// Rank reference candidates for every predicted junction, in predicted order.
pub fn rank_candidates<'a>(
    reference: &'a [Junction],
    predicted: &'a [Junction],
) -> Vec<PredictionRanking> {
    let mut loci: AHashMap<LocusKey<'a>, Vec<&'a Junction>> = AHashMap::new();
    for r in reference {
        loci.entry(locus_key(r)).or_default().push(r);
    }

    predicted.par_iter().map(|p| rank_one(p, &loci)).collect()
}
