//! Session orchestration: submission and the run loop.
//!
//! [`SearchPipeline::run`] walks one session through the state machine.
//! Each step advances the status with a compare-and-set before doing its
//! work, so two runs of the same session cannot interleave; the loser of
//! the race stops at the failed compare-and-set. Results are written
//! before the session flips to `completed`, so a `completed` status always
//! has its results readable.

use std::sync::Arc;

use cura_core::attributes::VisualAttributes;
use cura_core::gate::{apply_gate, GateOutcome, ScoredCandidate};
use cura_core::scoring::{explain_match, score};
use cura_core::search_status::{STATUS_ANALYZING, STATUS_PENDING, STATUS_SEARCHING};
use cura_core::types::DbId;
use cura_db::models::catalog::CatalogItem;
use cura_db::models::search_result::NewSearchResult;
use cura_db::models::visual_search::{CreateVisualSearch, VisualSearch};
use cura_db::repositories::{CatalogItemRepo, SearchResultRepo, VisualSearchRepo};
use cura_db::DbPool;
use cura_vision::{AttributeExtractor, ExtractionRequest};

use crate::candidates::select_candidates;
use crate::error::PipelineError;

/// Orchestrates visual search sessions against one database and one
/// attribute extractor. Cheap to clone and share.
#[derive(Clone)]
pub struct SearchPipeline {
    pool: DbPool,
    extractor: Arc<dyn AttributeExtractor>,
}

impl SearchPipeline {
    pub fn new(pool: DbPool, extractor: Arc<dyn AttributeExtractor>) -> Self {
        Self { pool, extractor }
    }

    /// Create a session row in `pending`. The caller decides when (and on
    /// which task) to [`run`](Self::run) it.
    pub async fn submit(&self, dto: &CreateVisualSearch) -> Result<VisualSearch, PipelineError> {
        let session = VisualSearchRepo::create(&self.pool, dto).await?;
        tracing::info!(search_id = session.id, user_id = %session.user_id, "Search submitted");
        Ok(session)
    }

    /// Run one session from `pending` to a terminal state.
    ///
    /// Any failure mid-run, whether extraction or the database itself,
    /// marks the session `failed` with the cause before the error
    /// surfaces; a clean run with nothing above the match threshold ends
    /// in `no_matches` and is not an error.
    pub async fn run(&self, id: DbId) -> Result<(), PipelineError> {
        let session = match VisualSearchRepo::find_by_id(&self.pool, id).await {
            Ok(Some(session)) => session,
            Ok(None) => return Err(PipelineError::SessionNotFound(id)),
            Err(err) => {
                let err = PipelineError::from(err);
                self.record_failure(id, STATUS_PENDING, &err).await;
                return Err(err);
            }
        };

        if let Err(err) = self.advance(id, STATUS_PENDING, STATUS_ANALYZING).await {
            self.record_failure(id, STATUS_PENDING, &err).await;
            return Err(err);
        }

        let attributes = match self.analyze(&session).await {
            Ok(attributes) => attributes,
            Err(err) => {
                let err = PipelineError::from(err);
                tracing::error!(search_id = id, error = %err, "Attribute extraction failed");
                self.record_failure(id, STATUS_ANALYZING, &err).await;
                return Err(err);
            }
        };

        if let Err(err) = self.record_analysis(id, &attributes).await {
            tracing::error!(search_id = id, error = %err, "Could not persist analysis");
            self.record_failure(id, STATUS_ANALYZING, &err).await;
            return Err(err);
        }

        match self.search(&session, &attributes).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(search_id = id, error = %err, "Candidate search failed");
                self.record_failure(id, STATUS_SEARCHING, &err).await;
                Err(err)
            }
        }
    }

    /// Store the extracted attributes and move the session into
    /// `searching`.
    async fn record_analysis(
        &self,
        id: DbId,
        attributes: &VisualAttributes,
    ) -> Result<(), PipelineError> {
        VisualSearchRepo::set_analysis(&self.pool, id, attributes).await?;
        self.advance(id, STATUS_ANALYZING, STATUS_SEARCHING).await
    }

    /// Best-effort terminal failure marker. A handled error must not
    /// leave the session parked in a non-terminal state, so the
    /// compare-and-set runs from the step's known status and a secondary
    /// failure is logged instead of propagated.
    async fn record_failure(&self, id: DbId, from: &'static str, cause: &PipelineError) {
        // A lost status race means another run owns the session now.
        if matches!(cause, PipelineError::StaleSession { .. }) {
            return;
        }
        match VisualSearchRepo::mark_failed(&self.pool, id, from, &cause.to_string()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(search_id = id, from, "Session moved on before failure was recorded");
            }
            Err(err) => {
                tracing::error!(search_id = id, error = %err, "Could not record session failure");
            }
        }
    }

    /// Extract attributes for the session's image and optional crop.
    async fn analyze(
        &self,
        session: &VisualSearch,
    ) -> Result<VisualAttributes, cura_vision::VisionError> {
        let request = ExtractionRequest {
            image_url: session.image_url.clone(),
            crop: session.crop.as_ref().map(|c| c.0),
        };
        self.extractor.extract(&request).await
    }

    /// Candidate search, scoring, gating, and persistence.
    async fn search(
        &self,
        session: &VisualSearch,
        query: &VisualAttributes,
    ) -> Result<(), PipelineError> {
        let items = CatalogItemRepo::list_active(&self.pool, session.budget().as_ref()).await?;
        let candidates = select_candidates(query, &items);

        let scored: Vec<ScoredCandidate<&CatalogItem>> = candidates
            .into_iter()
            .filter(|item| {
                // Rows without scorable attributes can only arrive via the
                // textual fallback; they carry no signal for the scorer.
                let scorable = item.attributes.0.is_scorable();
                if !scorable {
                    tracing::warn!(
                        search_id = session.id,
                        item_id = item.id,
                        "Skipping unscorable catalog item"
                    );
                }
                scorable
            })
            .map(|item| ScoredCandidate {
                score: score(query, &item.attributes.0),
                item,
            })
            .collect();

        let decision = apply_gate(scored);
        tracing::info!(
            search_id = session.id,
            accepted = decision.accepted.len(),
            outcome = decision.outcome.status(),
            "Gate decision"
        );

        if decision.outcome == GateOutcome::Completed {
            let rows: Vec<NewSearchResult> = decision
                .accepted
                .iter()
                .map(|c| {
                    NewSearchResult::from_match(
                        c.item,
                        c.score,
                        explain_match(query, &c.item.attributes.0),
                    )
                })
                .collect();
            // Results land before the status flips; a completed session
            // always has readable results.
            SearchResultRepo::insert_batch(&self.pool, session.id, &rows).await?;
        }

        self.advance(session.id, STATUS_SEARCHING, decision.outcome.status())
            .await
    }

    /// Compare-and-set status advance; a lost race aborts the run.
    async fn advance(
        &self,
        id: DbId,
        from: &'static str,
        to: &str,
    ) -> Result<(), PipelineError> {
        if VisualSearchRepo::transition(&self.pool, id, from, to).await? {
            Ok(())
        } else {
            Err(PipelineError::StaleSession { id, expected: from })
        }
    }
}
