use crate::engine::config::EngineConfig;
use crate::engine::search::BeamSearchEngine;
use crate::engine::{FullMove, SearchStats, Searcher};
use crate::logic::board::{Board, Color};
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Input {
    ComputeMove(Board, Color, EngineConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    MoveFound(FullMove, SearchStats),
    /// The side to move has no legal move, or the request was invalid.
    NoMove(String),
}

/// Runs the search off the UI thread. The engine is built on the first
/// request and reconfigured on later ones.
#[derive(Default)]
pub struct SearchWorker {
    engine: Option<BeamSearchEngine>,
}

impl SearchWorker {
    pub fn compute(&mut self, msg: Input) -> Output {
        match msg {
            Input::ComputeMove(board, player, config) => {
                if let Err(err) = config.validate() {
                    return Output::NoMove(err.to_string());
                }
                let config = Arc::new(config);

                let engine = self
                    .engine
                    .get_or_insert_with(|| BeamSearchEngine::new(config.clone()));
                engine.update_config(config);

                match engine.search(&board, player) {
                    Ok((mv, stats)) => Output::MoveFound(mv, stats),
                    Err(err) => Output::NoMove(err.to_string()),
                }
            }
        }
    }
}

impl Worker for SearchWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self::default()
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        let output = self.compute(msg);
        scope.respond(id, output);
    }
}
