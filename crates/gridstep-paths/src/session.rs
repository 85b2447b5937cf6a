//! [`SearchSession`]: one externally stepped search.
//!
//! ```text
//!            start              step (goal popped / open empty)
//!   Idle ───────────▶ Running ──────────────────────────────▶ Finished
//!    ▲                                                           │
//!    └──────────────────── reset (from any state) ◀──────────────┘
//! ```
//!
//! `start` is accepted from `Idle` and `Finished`. Each `step` pops exactly
//! one node, except the step that finds the open set empty, which pops
//! nothing and finishes the search with no path.

use std::time::Instant;

use gridstep_core::{Cell, ConfigError, GridConfig, GridModel, MAX_GRID_SIZE};

use crate::frontier::SearchFrontier;
use crate::guide::Guide;
use crate::heuristic::Heuristic;
use crate::report::{FinalStats, Finished, OpenEntry, Snapshot, Stats, StepOutcome};
use crate::strategy::Algorithm;

// ---------------------------------------------------------------------------
// Parameters and errors
// ---------------------------------------------------------------------------

/// How to search a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchParams {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    /// Heuristic weight for the A* family, at least 1.
    pub weight: f64,
    /// Intermediate targets for [`Algorithm::GuidedAstar`].
    pub waypoints: Vec<Cell>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            heuristic: Heuristic::default(),
            weight: 1.0,
            waypoints: Vec::new(),
        }
    }
}

impl SearchParams {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Cell>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Reject weights the A* family cannot use. Other algorithms ignore the
    /// weight, so any value passes for them.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.algorithm.uses_weight() && !(self.weight.is_finite() && self.weight >= 1.0) {
            return Err(SessionError::InvalidWeight(self.weight));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("weight {0} must be a finite number of at least 1")]
    InvalidWeight(f64),

    #[error("no active search")]
    NoActiveSearch,

    #[error("search already running; reset first")]
    AlreadyRunning,

    #[error("no previous configuration to restart")]
    NothingToRestart,
}

impl SessionError {
    /// Whether the request itself was malformed, as opposed to arriving in
    /// the wrong state.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidWeight(_))
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Found,
    NoPath,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Finished(Outcome),
}

/// Everything owned by one started search.
#[derive(Debug)]
struct Run {
    model: GridModel,
    algorithm: Algorithm,
    heuristic: Heuristic,
    weight: f64,
    guide: Option<Guide>,
    frontier: SearchFrontier,
    expanded: u64,
    started: Instant,
    path: Vec<Cell>,
    cost: Option<f64>,
}

impl Run {
    fn estimate(&self, c: Cell) -> f64 {
        let goal = self.model.goal();
        match &self.guide {
            Some(guide) => guide.estimate(self.heuristic, c, goal),
            None => self.heuristic.estimate(c, goal),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn stats(&self) -> Stats {
        Stats {
            expanded: self.expanded,
            elapsed_ms: self.elapsed_ms(),
        }
    }

    fn open_entries(&self) -> Vec<OpenEntry> {
        self.frontier
            .open_entries()
            .into_iter()
            .map(|(idx, n)| OpenEntry {
                cell: self.model.cell(idx),
                g: n.g,
                h: n.h,
                f: n.f,
            })
            .collect()
    }

    fn closed_cells(&self) -> Vec<Cell> {
        self.frontier
            .closed()
            .iter()
            .map(|&idx| self.model.cell(idx))
            .collect()
    }

    fn rescore_open(&mut self) {
        let Self {
            model,
            algorithm,
            heuristic,
            weight,
            guide,
            frontier,
            ..
        } = self;
        let Some(guide) = guide.as_ref() else {
            return;
        };
        let goal = model.goal();
        frontier.reprioritize(|idx, node| {
            let h = guide.estimate(*heuristic, model.cell(idx), goal);
            (
                h,
                algorithm.priority(node.g, h, *weight),
                algorithm.rank(node.g, h, *weight),
            )
        });
    }
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

/// One isolated search driven one expansion at a time.
///
/// The last accepted grid and parameters survive [`reset`](Self::reset) so
/// the same search can be run again with [`restart`](Self::restart).
#[derive(Debug)]
pub struct SearchSession {
    state: SearchState,
    max_size: i32,
    last: Option<(GridConfig, SearchParams)>,
    run: Option<Run>,
    // scratch buffer for neighbour queries
    nbuf: Vec<(Cell, f64)>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// A session accepting grids up to [`MAX_GRID_SIZE`].
    pub fn new() -> Self {
        Self::with_max_size(MAX_GRID_SIZE)
    }

    /// A session accepting grids up to `max_size` per side.
    pub fn with_max_size(max_size: i32) -> Self {
        Self {
            state: SearchState::Idle,
            max_size,
            last: None,
            run: None,
            nbuf: Vec::with_capacity(8),
        }
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The grid most recently accepted by `start`.
    pub fn config(&self) -> Option<&GridConfig> {
        self.last.as_ref().map(|(cfg, _)| cfg)
    }

    /// The parameters most recently accepted by `start`.
    pub fn params(&self) -> Option<&SearchParams> {
        self.last.as_ref().map(|(_, p)| p)
    }

    /// Counters of the current or finished search.
    pub fn stats(&self) -> Option<FinalStats> {
        self.run.as_ref().map(|run| FinalStats {
            expanded: run.expanded,
            elapsed_ms: run.elapsed_ms(),
            cost: run.cost,
        })
    }

    /// The path found, once finished successfully.
    pub fn path(&self) -> Option<&[Cell]> {
        match self.state {
            SearchState::Finished(Outcome::Found) => self.run.as_ref().map(|r| r.path.as_slice()),
            _ => None,
        }
    }

    /// Validate `config` and `params` and begin a new search.
    ///
    /// On error nothing about the session changes.
    pub fn start(&mut self, config: GridConfig, params: SearchParams) -> Result<(), SessionError> {
        if self.state == SearchState::Running {
            return Err(SessionError::AlreadyRunning);
        }
        params.validate()?;
        let model = GridModel::new(&config, self.max_size)?.with_costs(params.algorithm.costs());

        let heuristic = params.algorithm.effective_heuristic(params.heuristic);
        let guide = (params.algorithm == Algorithm::GuidedAstar)
            .then(|| Guide::new(&model, &params.waypoints));
        let weight = if params.algorithm.uses_weight() {
            params.weight
        } else {
            1.0
        };

        // Reuse the previous frontier's allocation when the grid has the
        // same number of cells.
        let frontier = match self.run.take() {
            Some(mut old) if old.model.len() == model.len() => {
                old.frontier.clear();
                old.frontier
            }
            _ => SearchFrontier::new(model.len()),
        };

        let mut run = Run {
            model,
            algorithm: params.algorithm,
            heuristic,
            weight,
            guide,
            frontier,
            expanded: 0,
            started: Instant::now(),
            path: Vec::new(),
            cost: None,
        };

        let start = run.model.start();
        let h = run.estimate(start);
        let start_idx = idx_of(&run.model, start);
        run.frontier.push(
            start_idx,
            0.0,
            h,
            run.algorithm.priority(0.0, h, weight),
            run.algorithm.rank(0.0, h, weight),
            None,
        );

        log::info!(
            "search started: {} on {}x{} grid, {} obstacles, {} -> {}, heuristic {}, weight {}",
            params.algorithm.name(),
            config.size,
            config.size,
            config.obstacles.len(),
            config.start,
            config.goal,
            heuristic.name(),
            weight
        );

        self.run = Some(run);
        self.state = SearchState::Running;
        self.last = Some((config, params));
        Ok(())
    }

    /// Start again with the grid and parameters last accepted by `start`.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let (config, params) = self.last.clone().ok_or(SessionError::NothingToRestart)?;
        self.start(config, params)
    }

    /// Drop the current search and return to `Idle`. The last accepted grid
    /// and parameters are kept.
    pub fn reset(&mut self) {
        if self.state != SearchState::Idle {
            log::info!("search reset from {:?}", self.state);
        }
        self.state = SearchState::Idle;
        self.run = None;
    }

    /// Advance the search by one expansion.
    pub fn step(&mut self) -> Result<StepOutcome, SessionError> {
        if self.state != SearchState::Running {
            return Err(SessionError::NoActiveSearch);
        }
        let Some(run) = self.run.as_mut() else {
            return Err(SessionError::NoActiveSearch);
        };

        let Some(ci) = run.frontier.pop() else {
            log::info!("no path: open set exhausted after {} expansions", run.expanded);
            self.state = SearchState::Finished(Outcome::NoPath);
            return Ok(StepOutcome::Finished(Finished {
                path: Vec::new(),
                current: None,
                open: Vec::new(),
                closed: run.closed_cells(),
                stats: FinalStats {
                    expanded: run.expanded,
                    elapsed_ms: run.elapsed_ms(),
                    cost: None,
                },
            }));
        };

        run.expanded += 1;
        let current = run.model.cell(ci);
        let current_g = run.frontier.node(ci).g;

        if current == run.model.goal() {
            run.path = run
                .frontier
                .path_to(ci)
                .into_iter()
                .map(|idx| run.model.cell(idx))
                .collect();
            run.cost = Some(current_g);
            log::info!(
                "path found: {} cells, cost {:.3}, {} expansions",
                run.path.len(),
                current_g,
                run.expanded
            );
            self.state = SearchState::Finished(Outcome::Found);
            return Ok(StepOutcome::Finished(Finished {
                path: run.path.clone(),
                current: Some(current),
                open: run.open_entries(),
                closed: run.closed_cells(),
                stats: FinalStats {
                    expanded: run.expanded,
                    elapsed_ms: run.elapsed_ms(),
                    cost: run.cost,
                },
            }));
        }

        let mut touched = Vec::new();
        self.nbuf.clear();
        run.model.neighbors(current, &mut self.nbuf);
        for &(nc, move_cost) in &self.nbuf {
            let ni = idx_of(&run.model, nc);
            if run.frontier.is_closed(ni) {
                continue;
            }
            let g = current_g + move_cost;
            let h = run.estimate(nc);
            let pushed = run.frontier.push(
                ni,
                g,
                h,
                run.algorithm.priority(g, h, run.weight),
                run.algorithm.rank(g, h, run.weight),
                Some(ci),
            );
            if pushed.changed() {
                touched.push(nc);
            }
            let advanced = run.guide.as_mut().is_some_and(|guide| guide.advance(nc));
            if advanced {
                log::debug!("waypoint {} reached, rescoring open set", nc);
                run.rescore_open();
            }
        }

        log::debug!(
            "expanded {} (g={:.3}), {} neighbours changed, open={}",
            current,
            current_g,
            touched.len(),
            run.frontier.open_len()
        );

        Ok(StepOutcome::Snapshot(Snapshot {
            current,
            neighbors: touched,
            open: run.open_entries(),
            closed: run.closed_cells(),
            stats: run.stats(),
            target: run.guide.as_ref().map(Guide::target),
        }))
    }

    /// Step until the search finishes and return the final report.
    pub fn run_to_end(&mut self) -> Result<Finished, SessionError> {
        loop {
            if let StepOutcome::Finished(f) = self.step()? {
                return Ok(f);
            }
        }
    }
}

/// Index of a cell the model produced itself (start, or a neighbour).
#[inline]
fn idx_of(model: &GridModel, c: Cell) -> usize {
    let side = model.size() as usize;
    c.y as usize * side + c.x as usize
}

#[cfg(test)]
mod tests {
    use std::f64::consts::SQRT_2;

    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    use super::*;

    fn grid(size: i32, start: (i32, i32), goal: (i32, i32), obstacles: &[(i32, i32)]) -> GridConfig {
        GridConfig::new(size, start.into(), goal.into())
            .with_obstacles(obstacles.iter().map(|&c| Cell::from(c)))
    }

    fn started(config: GridConfig, params: SearchParams) -> SearchSession {
        let mut s = SearchSession::new();
        s.start(config, params).unwrap();
        s
    }

    fn collect(s: &mut SearchSession) -> Vec<StepOutcome> {
        let mut out = Vec::new();
        loop {
            let o = s.step().unwrap();
            let done = o.is_finished();
            out.push(o.without_timing());
            if done {
                return out;
            }
        }
    }

    /// Checks the path is a chain of legal moves from start to goal and
    /// returns its cost.
    fn path_cost(model: &GridModel, path: &[Cell]) -> f64 {
        assert_eq!(path.first(), Some(&model.start()));
        assert_eq!(path.last(), Some(&model.goal()));
        path.windows(2)
            .map(|w| model.move_cost(w[0], w[1]).expect("illegal move in path"))
            .sum()
    }

    /// Cheapest cost from start to goal by Bellman-Ford relaxation.
    fn brute_force(model: &GridModel) -> Option<f64> {
        let mut dist = vec![f64::INFINITY; model.len()];
        dist[model.index(model.start()).unwrap()] = 0.0;
        let mut buf = Vec::new();
        loop {
            let mut changed = false;
            for idx in 0..model.len() {
                let c = model.cell(idx);
                if !dist[idx].is_finite() || !model.is_free(c) {
                    continue;
                }
                buf.clear();
                model.neighbors(c, &mut buf);
                for &(n, cost) in &buf {
                    let ni = model.index(n).unwrap();
                    if dist[idx] + cost < dist[ni] - 1e-12 {
                        dist[ni] = dist[idx] + cost;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        let d = dist[model.index(model.goal()).unwrap()];
        d.is_finite().then_some(d)
    }

    fn random_grid(rng: &mut StdRng, diagonal: bool) -> GridConfig {
        let size = rng.random_range(4..12);
        let start = Cell::new(rng.random_range(0..size), rng.random_range(0..size));
        let mut goal = start;
        while goal == start {
            goal = Cell::new(rng.random_range(0..size), rng.random_range(0..size));
        }
        let obstacles = (0..size * size)
            .map(|i| Cell::new(i % size, i / size))
            .filter(|&c| c != start && c != goal && rng.random_range(0..100) < 30);
        GridConfig::new(size, start, goal)
            .with_obstacles(obstacles.collect::<Vec<_>>())
            .with_diagonal(diagonal)
    }

    #[test]
    fn straight_corridor_without_diagonals() {
        let mut s = started(grid(3, (0, 0), (2, 2), &[]), SearchParams::new(Algorithm::Dijkstra));
        let f = s.run_to_end().unwrap();
        assert!(f.found());
        assert_eq!(f.path.len(), 5);
        assert_eq!(f.stats.cost, Some(4.0));
        assert_eq!(f.current, Some(Cell::new(2, 2)));
        assert_eq!(s.state(), SearchState::Finished(Outcome::Found));
        assert_eq!(s.path().map(<[Cell]>::len), Some(5));
    }

    #[test]
    fn diagonal_shortcut() {
        let cfg = grid(3, (0, 0), (2, 2), &[]).with_diagonal(true);
        let mut s = started(cfg, SearchParams::new(Algorithm::Dijkstra));
        let f = s.run_to_end().unwrap();
        assert_eq!(f.path, vec![Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)]);
        let cost = f.stats.cost.unwrap();
        assert!((cost - 2.0 * SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn wall_means_no_path() {
        let cfg = grid(3, (0, 0), (2, 0), &[(1, 0), (1, 1), (1, 2)]);
        let mut s = started(cfg, SearchParams::default());
        let f = s.run_to_end().unwrap();
        assert!(!f.found());
        assert!(f.path.is_empty());
        assert_eq!(f.stats.cost, None);
        assert_eq!(f.current, None);
        // Only the left column was reachable.
        assert_eq!(f.stats.expanded, 3);
        assert_eq!(f.closed.len(), 3);
        assert_eq!(s.state(), SearchState::Finished(Outcome::NoPath));
        assert_eq!(s.path(), None);
    }

    #[test]
    fn reset_and_start_replays_identically() {
        let cfg = grid(8, (0, 0), (7, 5), &[(3, 0), (3, 1), (3, 2), (3, 3), (5, 5)])
            .with_diagonal(true);
        let params = SearchParams::new(Algorithm::Astar).with_heuristic(Heuristic::Euclidean);
        let mut s = started(cfg.clone(), params.clone());
        let first = collect(&mut s);
        s.reset();
        assert_eq!(s.state(), SearchState::Idle);
        s.start(cfg, params).unwrap();
        assert_eq!(collect(&mut s), first);
    }

    #[test]
    fn restart_reuses_last_request() {
        let mut s = SearchSession::new();
        assert_eq!(s.restart(), Err(SessionError::NothingToRestart));

        s.start(grid(5, (0, 0), (4, 4), &[(2, 2)]), SearchParams::new(Algorithm::Greedy))
            .unwrap();
        let first = collect(&mut s);
        s.reset();
        assert!(s.config().is_some());
        s.restart().unwrap();
        assert_eq!(s.params().map(|p| p.algorithm), Some(Algorithm::Greedy));
        assert_eq!(collect(&mut s), first);
    }

    #[test]
    fn every_step_expands_one_node() {
        let cfg = grid(10, (1, 1), (8, 7), &[(4, 2), (4, 3), (4, 4), (4, 5), (4, 6)])
            .with_diagonal(true);
        for algorithm in Algorithm::ALL {
            let mut s = started(cfg.clone(), SearchParams::new(algorithm));
            let mut expected = 0;
            loop {
                let o = s.step().unwrap();
                expected += 1;
                assert_eq!(o.expanded(), expected, "{}", algorithm.name());
                let (open, closed) = match &o {
                    StepOutcome::Snapshot(snap) => {
                        assert_eq!(snap.closed.last(), Some(&snap.current));
                        (&snap.open, &snap.closed)
                    }
                    StepOutcome::Finished(f) => (&f.open, &f.closed),
                };
                for e in open {
                    assert!(!closed.contains(&e.cell), "{} open and closed", e.cell);
                }
                if o.is_finished() {
                    break;
                }
            }
        }
    }

    #[test]
    fn snapshot_reports_discovered_neighbours() {
        let mut s = started(grid(3, (1, 1), (2, 2), &[(1, 0)]), SearchParams::new(Algorithm::Bfs));
        let StepOutcome::Snapshot(snap) = s.step().unwrap() else {
            panic!("finished too early");
        };
        assert_eq!(snap.current, Cell::new(1, 1));
        // N is blocked; E, S, W in enumeration order.
        assert_eq!(snap.neighbors, vec![Cell::new(2, 1), Cell::new(1, 2), Cell::new(0, 1)]);
        let open: Vec<Cell> = snap.open.iter().map(|e| e.cell).collect();
        assert_eq!(open, snap.neighbors);
        assert_eq!(snap.target, None);
    }

    #[test]
    fn open_entries_carry_costs() {
        let params = SearchParams::new(Algorithm::Astar).with_heuristic(Heuristic::Manhattan);
        let mut s = started(grid(4, (0, 0), (3, 0), &[]), params);
        let StepOutcome::Snapshot(snap) = s.step().unwrap() else {
            panic!("finished too early");
        };
        let east = snap.open.iter().find(|e| e.cell == Cell::new(1, 0)).unwrap();
        assert_eq!((east.g, east.h, east.f), (1.0, 2.0, 3.0));
        assert_eq!(snap.open[0].cell, Cell::new(1, 0));
    }

    #[test]
    fn optimal_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        for round in 0..60 {
            let diagonal = round % 2 == 0;
            let cfg = random_grid(&mut rng, diagonal);
            let model = GridModel::new(&cfg, MAX_GRID_SIZE).unwrap();
            let best = brute_force(&model);
            for h in Heuristic::ALL.into_iter().filter(|h| h.is_admissible(diagonal)) {
                for algorithm in [Algorithm::Dijkstra, Algorithm::Astar] {
                    let mut s = started(cfg.clone(), SearchParams::new(algorithm).with_heuristic(h));
                    let f = s.run_to_end().unwrap();
                    match best {
                        None => assert!(!f.found()),
                        Some(best) => {
                            let cost = f.stats.cost.unwrap();
                            assert!((cost - best).abs() < 1e-9, "round {round}: {cost} vs {best}");
                            assert!((path_cost(&model, &f.path) - cost).abs() < 1e-9);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn bfs_counts_edges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..40 {
            let cfg = random_grid(&mut rng, true);
            let unit = GridModel::new(&cfg, MAX_GRID_SIZE)
                .unwrap()
                .with_costs(gridstep_core::CostModel::UNIT);
            let mut s = started(cfg, SearchParams::new(Algorithm::Bfs));
            let f = s.run_to_end().unwrap();
            assert_eq!(f.stats.cost, brute_force(&unit));
            if f.found() {
                assert_eq!(f.stats.cost, Some((f.path.len() - 1) as f64));
            }
        }
    }

    #[test]
    fn greedy_and_weighted_find_valid_paths() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            let cfg = random_grid(&mut rng, true);
            let model = GridModel::new(&cfg, MAX_GRID_SIZE).unwrap();
            let reachable = brute_force(&model).is_some();
            for params in [
                SearchParams::new(Algorithm::Greedy),
                SearchParams::new(Algorithm::Astar).with_weight(2.5),
            ] {
                let f = started(cfg.clone(), params).run_to_end().unwrap();
                assert_eq!(f.found(), reachable);
                if reachable {
                    let cost = path_cost(&model, &f.path);
                    assert!((cost - f.stats.cost.unwrap()).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn guided_search_follows_waypoints() {
        let cfg = grid(8, (0, 0), (7, 7), &[]).with_diagonal(true);
        let params = SearchParams::new(Algorithm::GuidedAstar).with_waypoints(vec![Cell::new(6, 1)]);
        let mut s = started(cfg.clone(), params);
        let StepOutcome::Snapshot(first) = s.step().unwrap() else {
            panic!("finished too early");
        };
        assert_eq!(first.target, Some(Cell::new(6, 1)));
        let f = s.run_to_end().unwrap();
        assert!(f.found());
        let model = GridModel::new(&cfg, MAX_GRID_SIZE).unwrap();
        path_cost(&model, &f.path);
    }

    #[test]
    fn guided_without_waypoints_matches_astar_cost() {
        let cfg = grid(12, (0, 0), (11, 5), &[]).with_diagonal(true);
        let astar = started(cfg.clone(), SearchParams::new(Algorithm::Astar))
            .run_to_end()
            .unwrap();
        let guided = started(cfg, SearchParams::new(Algorithm::GuidedAstar))
            .run_to_end()
            .unwrap();
        let (a, g) = (astar.stats.cost.unwrap(), guided.stats.cost.unwrap());
        assert!((a - g).abs() < 1e-9);
    }

    #[test]
    fn step_requires_running_search() {
        let mut s = SearchSession::new();
        assert_eq!(s.step(), Err(SessionError::NoActiveSearch));
        s.start(grid(2, (0, 0), (1, 0), &[]), SearchParams::default()).unwrap();
        s.run_to_end().unwrap();
        assert_eq!(s.step(), Err(SessionError::NoActiveSearch));
        // A finished search may be replaced without a reset.
        s.start(grid(2, (0, 0), (0, 1), &[]), SearchParams::default()).unwrap();
        assert_eq!(s.state(), SearchState::Running);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut s = started(grid(4, (0, 0), (3, 3), &[]), SearchParams::default());
        s.step().unwrap();
        let err = s.start(grid(4, (0, 0), (1, 1), &[]), SearchParams::default());
        assert_eq!(err, Err(SessionError::AlreadyRunning));
        assert_eq!(s.config().map(|c| c.goal), Some(Cell::new(3, 3)));
        assert_eq!(s.stats().map(|st| st.expanded), Some(1));
    }

    #[test]
    fn invalid_start_changes_nothing() {
        let mut s = SearchSession::new();
        let err = s.start(grid(3, (0, 0), (2, 2), &[(2, 2)]), SearchParams::default());
        assert!(matches!(err, Err(SessionError::Config(ConfigError::Blocked { .. }))));
        assert!(err.unwrap_err().is_config());
        assert_eq!(s.state(), SearchState::Idle);
        assert!(s.config().is_none());

        let err = s.start(grid(201, (0, 0), (2, 2), &[]), SearchParams::default());
        assert!(matches!(err, Err(SessionError::Config(ConfigError::InvalidSize { .. }))));
        assert_eq!(s.state(), SearchState::Idle);
    }

    #[test]
    fn weight_is_checked_for_astar_only() {
        let mut s = SearchSession::new();
        let cfg = grid(3, (0, 0), (2, 2), &[]);
        for w in [0.5, f64::NAN, f64::INFINITY] {
            let err = s.start(cfg.clone(), SearchParams::default().with_weight(w));
            assert!(matches!(err, Err(SessionError::InvalidWeight(_))));
        }
        assert_eq!(s.state(), SearchState::Idle);
        s.start(cfg, SearchParams::new(Algorithm::Dijkstra).with_weight(0.0)).unwrap();
    }

    #[test]
    fn smaller_max_size_is_enforced() {
        let mut s = SearchSession::with_max_size(4);
        let err = s.start(grid(5, (0, 0), (4, 4), &[]), SearchParams::default());
        assert_eq!(
            err,
            Err(SessionError::Config(ConfigError::InvalidSize { size: 5, max: 4 }))
        );
    }
}
