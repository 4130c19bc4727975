use crate::peer::types::IceCandidate;

/// Candidate counts by type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSummary {
    pub host: usize,
    pub srflx: usize,
    pub prflx: usize,
    pub relay: usize,
}

pub fn summarize_candidates(candidates: &[IceCandidate]) -> CandidateSummary {
    let mut summary = CandidateSummary::default();

    for candidate in candidates {
        if candidate.candidate.contains("typ host") {
            summary.host += 1;
        } else if candidate.candidate.contains("typ srflx") {
            summary.srflx += 1;
        } else if candidate.candidate.contains("typ prflx") {
            summary.prflx += 1;
        } else if candidate.candidate.contains("typ relay") {
            summary.relay += 1;
        }
    }
    summary
}

pub fn analyze_candidates(candidates: &[IceCandidate]) -> CandidateSummary {
    let summary = summarize_candidates(candidates);

    log::info!(
        "Candidate analysis: {} host, {} srflx, {} prflx, {} relay",
        summary.host,
        summary.srflx,
        summary.prflx,
        summary.relay
    );

    if summary.srflx == 0 {
        log::warn!("No server-reflexive candidates found, STUN servers may be unreachable");
    }
    summary
}
