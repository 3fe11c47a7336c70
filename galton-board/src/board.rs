// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build and run the board.
//!
//! The board is built one row at a time. Row `r` holds `r + 1` channels. The
//! routers that feed row `r` each consume one channel of row `r - 1` and are
//! connected to the two channels of row `r` that straddle their position:
//!
//! ```text
//! row r-1:      ch0       ch1       ch2
//!                |         |         |
//!             router0   router1   router2
//!              /   \     /   \     /   \
//! row r:    ch0     ch1       ch2       ch3
//! ```
//!
//! The channels at either end of a row have a single producer, all others
//! have two. Every router closes both of its outputs once its input has
//! closed, so a channel only closes once all the routers feeding it are done.

use std::rc::Rc;

use galton_components::completion::Completion;
use galton_components::router::{CoinFlip, Router};
use galton_components::sink::Sink;
use galton_components::source::Source;
use galton_engine::engine::Engine;
use galton_engine::port::InPort;
use galton_engine::sim_error;
use galton_engine::types::SimError;
use galton_track::entity::Entity;
use galton_track::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BoardConfig;
use crate::marble::{Marble, MarbleGen};

/// The channels between two rows of routers, from left to right.
pub type Row = Vec<InPort<Marble>>;

/// Build row `row_index` of the board from the row above it.
///
/// One router is registered for each of the `inputs`, and the returned row is
/// one channel wider than `inputs`. Each router gets its own random number
/// generator seeded from `rng`.
pub fn next_row(
    engine: &Engine,
    parent: &Rc<Entity>,
    row_index: usize,
    inputs: Row,
    rng: &mut StdRng,
) -> Result<Row, SimError> {
    let width = inputs.len();
    if width == 0 {
        return sim_error!(format!("{parent}: row {row_index} has no inputs"));
    }

    let row = Rc::new(Entity::new(parent, &format!("row{row_index}")));
    let mut outputs = Vec::with_capacity(width + 1);
    for i in 0..=width {
        let num_producers = if i == 0 || i == width { 1 } else { 2 };
        outputs.push(InPort::new_with_producers(
            &row,
            &format!("ch{i}"),
            num_producers,
        )?);
    }

    for (i, rx) in inputs.into_iter().enumerate() {
        let algorithm = CoinFlip::new(StdRng::seed_from_u64(rng.r#gen()));
        let router = Router::new_and_register_with_rx(
            engine,
            &row,
            &format!("router{i}"),
            rx,
            2,
            Box::new(algorithm),
        )?;
        router.connect_port_tx_i(0, outputs[i].state())?;
        router.connect_port_tx_i(1, outputs[i + 1].state())?;
    }

    debug!(row ; "{} routers feeding {} channels", width, width + 1);
    Ok(outputs)
}

/// A board whose components have all been registered with an [`Engine`].
pub struct Board {
    source: Rc<Source<Marble>>,
    bins: Vec<Rc<Sink<Marble>>>,
    completion: Completion,
}

/// Build the whole board described by `config`.
///
/// Nothing moves until the engine is run, see [`Board::run`].
pub fn build_board(engine: &Engine, config: &BoardConfig) -> Result<Board, SimError> {
    config.validate()?;

    let top = engine.top().clone();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let source = Source::new_and_register(engine, &top, "source", None)?;
    source.set_generator(Some(Box::new(MarbleGen::new(
        source.entity(),
        config.marbles,
    ))));

    let row0 = Rc::new(Entity::new(&top, "row0"));
    let first = InPort::new(&row0, "ch0");
    source.connect_port_tx(first.state())?;

    let mut row = vec![first];
    for row_index in 1..config.bins {
        row = next_row(engine, &top, row_index, row, &mut rng)?;
    }

    let completion = Completion::new(&top, "completion", row.len())?;
    let bins_entity = Rc::new(Entity::new(&top, "bins"));
    let mut bins = Vec::with_capacity(row.len());
    for (i, rx) in row.into_iter().enumerate() {
        bins.push(Sink::new_and_register_with_rx(
            engine,
            &bins_entity,
            &format!("bin{i}"),
            rx,
            Some(completion.clone()),
        )?);
    }

    info!(top ; "Built board: {} marbles, {} rows, {} routers, {} bins",
        config.marbles, config.num_rows(), config.num_routers(), bins.len());

    Ok(Board {
        source,
        bins,
        completion,
    })
}

impl Board {
    /// Run the engine until every bin has finished counting.
    ///
    /// Returns the number of marbles in each bin, from left to right. It is
    /// an error for the engine to stop before all bins have finished.
    pub fn run(&self, engine: &mut Engine) -> Result<Vec<usize>, SimError> {
        engine.run_until(self.completion.event())?;

        if !self.completion.is_complete() {
            return sim_error!(format!(
                "deadlock: {} of {} bins did not finish",
                self.completion.remaining(),
                self.bins.len()
            ));
        }
        self.bin_counts()
    }

    /// The number of marbles in each bin.
    ///
    /// The counts are only available once every bin has finished.
    pub fn bin_counts(&self) -> Result<Vec<usize>, SimError> {
        if !self.completion.is_complete() {
            return sim_error!(format!(
                "{}: results are not ready, {} bins still counting",
                self.completion,
                self.completion.remaining()
            ));
        }
        Ok(self.bins.iter().map(|bin| bin.num_sunk()).collect())
    }

    #[must_use]
    pub fn num_dropped(&self) -> usize {
        self.source.num_sent()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }
}
