// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApplyLedger, ApplyUnit, CoreError, GameRecord, LeagueSeasonRecord, LedgerEntry,
    NewLedgerEntry, ScheduleWriter, SeasonReader, SeasonRecord, TransactionalStore,
};
use league_scheduler_domain::{
    AccountId, Assignment, ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate,
    FieldId, Game, GameId, GameStatus, IdempotencyKey, LeagueSeasonId, LeagueSelection,
    ProblemSpec, RunId, SeasonConfig, SeasonId, Team, TeamExclusion, TeamId, Umpire,
    UmpireExclusion, UmpireId, WeekdayMask,
};
use std::collections::BTreeMap;
use time::macros::{date, time};
use time::{Date, Time, Weekday};

pub const ACCOUNT: AccountId = AccountId::new(1);
pub const SEASON: SeasonId = SeasonId::new(10);
pub const LEAGUE: LeagueSeasonId = LeagueSeasonId::new(100);
pub const MAIN_FIELD: FieldId = FieldId::new(1);
pub const ANNEX_FIELD: FieldId = FieldId::new(2);
pub const UMP_A: UmpireId = UmpireId::new(1);
pub const UMP_B: UmpireId = UmpireId::new(2);

/// Monday 2026-04-06.
pub const MONDAY: Date = date!(2026 - 04 - 06);
/// Tuesday 2026-04-07.
pub const TUESDAY: Date = date!(2026 - 04 - 07);

pub fn run_id(value: &str) -> RunId {
    RunId::new(value).unwrap()
}

pub fn game(id: i64, home: i64, visitor: i64) -> Game {
    Game::new(GameId::new(id), LEAGUE, TeamId::new(home), TeamId::new(visitor))
}

pub fn assignment(
    game_id: i64,
    field_id: FieldId,
    date: Date,
    start: Time,
    umpires: &[UmpireId],
) -> Assignment {
    Assignment::new(GameId::new(game_id), field_id, date, start, umpires.to_vec())
}

pub fn create_test_config() -> SeasonConfig {
    SeasonConfig::new(date!(2026 - 04 - 01), date!(2026 - 06 - 30), 1)
}

fn weekdays() -> WeekdayMask {
    WeekdayMask::from_days(&[
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ])
}

pub fn create_test_fields() -> Vec<Field> {
    vec![
        Field::new(MAIN_FIELD, "Main"),
        Field::new(ANNEX_FIELD, "Annex").with_lights(false),
    ]
}

pub fn create_test_rules() -> Vec<FieldAvailabilityRule> {
    vec![
        FieldAvailabilityRule::new(
            MAIN_FIELD,
            WeekdayMask::from_days(&[Weekday::Monday, Weekday::Wednesday, Weekday::Friday]),
            time!(18:00),
            time!(20:00),
        ),
        FieldAvailabilityRule::new(ANNEX_FIELD, weekdays(), time!(17:00), time!(22:00)),
    ]
}

/// A season from April to June with teams 1-4 in one league, a lit main
/// field open Mon/Wed/Fri 18:00-20:00, an unlit annex open weekdays
/// 17:00-22:00, two umpires with one required per game, and games
/// 1 (1 v 2), 2 (3 v 4) and 3 (1 v 3).
pub fn create_test_spec() -> ProblemSpec {
    let mut spec: ProblemSpec = ProblemSpec::new(ACCOUNT, SEASON, create_test_config());
    spec.teams = (1..=4)
        .map(|id| Team::new(TeamId::new(id), LEAGUE, &format!("Team {id}")))
        .collect();
    spec.fields = create_test_fields();
    spec.umpires = vec![Umpire::new(UMP_A, "Alex"), Umpire::new(UMP_B, "Blake")];
    spec.games = vec![game(1, 1, 2), game(2, 3, 4), game(3, 1, 3)];
    spec.field_availability_rules = create_test_rules();
    spec
}

/// Everything an [`InMemoryStore`] holds. Cloned at the start of each
/// transaction and swapped in on commit.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub seasons: Vec<SeasonRecord>,
    pub leagues: Vec<LeagueSeasonRecord>,
    pub teams: Vec<Team>,
    pub fields: Vec<Field>,
    pub umpires: Vec<Umpire>,
    pub games: BTreeMap<GameId, GameRecord>,
    pub rules: Vec<FieldAvailabilityRule>,
    pub exclusion_dates: Vec<FieldExclusionDate>,
    pub season_exclusions: Vec<ExclusionWindow>,
    pub team_exclusions: Vec<TeamExclusion>,
    pub umpire_exclusions: Vec<UmpireExclusion>,
    pub config: Option<SeasonConfig>,
    pub selections: Vec<LeagueSelection>,
    pub ledger: BTreeMap<(AccountId, IdempotencyKey), LedgerEntry>,
    /// Calls to `upsert_assignments` or `clear_assignments` that changed
    /// at least one game.
    pub schedule_writes: usize,
    /// A ledger entry recorded by a concurrent apply. Invisible to reads
    /// until the transaction that collides with it rolls back.
    pub hidden_winner: Option<LedgerEntry>,
}

impl SeasonReader for StoreState {
    fn find_season(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
    ) -> Result<Option<SeasonRecord>, CoreError> {
        Ok(self
            .seasons
            .iter()
            .find(|s| s.account_id == account_id && s.season_id == season_id)
            .cloned())
    }

    fn list_league_seasons(
        &mut self,
        _season_id: SeasonId,
    ) -> Result<Vec<LeagueSeasonRecord>, CoreError> {
        Ok(self.leagues.clone())
    }

    fn list_teams(&mut self, _season_id: SeasonId) -> Result<Vec<Team>, CoreError> {
        Ok(self.teams.clone())
    }

    fn list_fields(&mut self, _account_id: AccountId) -> Result<Vec<Field>, CoreError> {
        Ok(self.fields.clone())
    }

    fn list_umpires(&mut self, _account_id: AccountId) -> Result<Vec<Umpire>, CoreError> {
        Ok(self.umpires.clone())
    }

    fn list_games(&mut self, _season_id: SeasonId) -> Result<Vec<GameRecord>, CoreError> {
        Ok(self.games.values().cloned().collect())
    }

    fn list_field_availability_rules(
        &mut self,
        _account_id: AccountId,
    ) -> Result<Vec<FieldAvailabilityRule>, CoreError> {
        Ok(self.rules.clone())
    }

    fn list_field_exclusion_dates(
        &mut self,
        _account_id: AccountId,
    ) -> Result<Vec<FieldExclusionDate>, CoreError> {
        Ok(self.exclusion_dates.clone())
    }

    fn list_season_exclusions(
        &mut self,
        _season_id: SeasonId,
    ) -> Result<Vec<ExclusionWindow>, CoreError> {
        Ok(self.season_exclusions.clone())
    }

    fn list_team_exclusions(
        &mut self,
        _season_id: SeasonId,
    ) -> Result<Vec<TeamExclusion>, CoreError> {
        Ok(self.team_exclusions.clone())
    }

    fn list_umpire_exclusions(
        &mut self,
        _account_id: AccountId,
    ) -> Result<Vec<UmpireExclusion>, CoreError> {
        Ok(self.umpire_exclusions.clone())
    }

    fn find_scheduler_config(
        &mut self,
        _season_id: SeasonId,
    ) -> Result<Option<SeasonConfig>, CoreError> {
        Ok(self.config.clone())
    }

    fn list_league_selections(
        &mut self,
        _season_id: SeasonId,
    ) -> Result<Vec<LeagueSelection>, CoreError> {
        Ok(self.selections.clone())
    }
}

impl ApplyLedger for StoreState {
    fn find_ledger_entry(
        &mut self,
        account_id: AccountId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEntry>, CoreError> {
        Ok(self.ledger.get(&(account_id, key.clone())).cloned())
    }

    fn record_ledger_entry(&mut self, entry: &NewLedgerEntry) -> Result<(), CoreError> {
        let slot: (AccountId, IdempotencyKey) = (entry.account_id, entry.idempotency_key.clone());
        let contended: bool = self.ledger.contains_key(&slot)
            || self.hidden_winner.as_ref().is_some_and(|winner| {
                winner.account_id == entry.account_id
                    && winner.idempotency_key == entry.idempotency_key
            });
        if contended {
            return Err(CoreError::LedgerContention {
                key: entry.idempotency_key.to_string(),
            });
        }
        self.ledger.insert(
            slot,
            LedgerEntry {
                account_id: entry.account_id,
                season_id: entry.season_id,
                idempotency_key: entry.idempotency_key.clone(),
                run_id: entry.run_id.clone(),
                request_fingerprint: entry.request_fingerprint.clone(),
                result: entry.result.clone(),
                applied_at: String::from("2026-04-01T12:00:00Z"),
            },
        );
        Ok(())
    }
}

impl ScheduleWriter for StoreState {
    fn upsert_assignments(
        &mut self,
        _season_id: SeasonId,
        assignments: &[Assignment],
    ) -> Result<(), CoreError> {
        if assignments.is_empty() {
            return Ok(());
        }
        for assignment in assignments {
            let record: &mut GameRecord = self.games.get_mut(&assignment.game_id).ok_or_else(|| {
                CoreError::Store(format!("game {} does not exist", assignment.game_id))
            })?;
            record.assignment = Some(assignment.clone());
            record.game.status = GameStatus::Scheduled;
        }
        self.schedule_writes += 1;
        Ok(())
    }

    fn clear_assignments(
        &mut self,
        _season_id: SeasonId,
        game_ids: &[GameId],
    ) -> Result<(), CoreError> {
        if game_ids.is_empty() {
            return Ok(());
        }
        for game_id in game_ids {
            if let Some(record) = self.games.get_mut(game_id) {
                record.assignment = None;
                record.game.status = GameStatus::Unscheduled;
            }
        }
        self.schedule_writes += 1;
        Ok(())
    }
}

/// A store keeping everything in memory with copy-on-write transactions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub state: StoreState,
    pub transactions: usize,
}

impl InMemoryStore {
    pub fn placement(&self, game_id: i64) -> Option<Assignment> {
        self.state
            .games
            .get(&GameId::new(game_id))
            .and_then(|record| record.assignment.clone())
    }

    pub fn status(&self, game_id: i64) -> GameStatus {
        self.state.games[&GameId::new(game_id)].game.status
    }

    pub fn place(&mut self, placed: Assignment) {
        let record: &mut GameRecord = self.state.games.get_mut(&placed.game_id).unwrap();
        record.game.status = GameStatus::Scheduled;
        record.assignment = Some(placed);
    }

    pub fn add_game(&mut self, game: Game) {
        self.state.games.insert(
            game.game_id,
            GameRecord {
                game,
                assignment: None,
            },
        );
    }
}

impl TransactionalStore for InMemoryStore {
    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn ApplyUnit) -> Result<T, CoreError>,
    {
        self.transactions += 1;
        let mut working: StoreState = self.state.clone();
        match work(&mut working) {
            Ok(value) => {
                self.state = working;
                Ok(value)
            }
            Err(err) => {
                // The concurrent apply commits while this one rolls back.
                if let Some(winner) = self.state.hidden_winner.take() {
                    self.state.ledger.insert(
                        (winner.account_id, winner.idempotency_key.clone()),
                        winner,
                    );
                }
                Err(err)
            }
        }
    }
}

/// A store seeded with the same season as [`create_test_spec`], no
/// placements and no league selections.
pub fn create_test_store() -> InMemoryStore {
    let mut store: InMemoryStore = InMemoryStore::default();
    store.state.seasons.push(SeasonRecord {
        account_id: ACCOUNT,
        season_id: SEASON,
        name: String::from("Spring 2026"),
    });
    store.state.leagues.push(LeagueSeasonRecord {
        league_season_id: LEAGUE,
        league_name: String::from("Majors"),
    });
    store.state.teams = (1..=4)
        .map(|id| Team::new(TeamId::new(id), LEAGUE, &format!("Team {id}")))
        .collect();
    store.state.fields = create_test_fields();
    store.state.umpires = vec![Umpire::new(UMP_A, "Alex"), Umpire::new(UMP_B, "Blake")];
    store.state.rules = create_test_rules();
    store.state.config = Some(create_test_config());
    for scheduled in [game(1, 1, 2), game(2, 3, 4), game(3, 1, 3)] {
        store.add_game(scheduled);
    }
    store
}
