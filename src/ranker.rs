//! Quality ranking of raw sources.

use std::cmp::Reverse;
use ytsdebrid_common::Torrent;

/// Order sources best quality first.
///
/// `2160p > 1080p > 720p > 480p > unknown`; sources of equal tier keep their
/// input order. The input is left untouched.
pub fn rank(sources: &[Torrent]) -> Vec<Torrent> {
    let mut ranked = sources.to_vec();
    // sort_by_key is stable
    ranked.sort_by_key(|t| Reverse(t.quality.tier()));
    ranked
}
