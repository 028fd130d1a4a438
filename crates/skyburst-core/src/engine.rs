//! The economy engine: owns the catalog, the player state, and the event
//! bus, and exposes every economy operation.
//!
//! # Operations
//!
//! - [`Engine::click`] -- credit sparks for a manual click.
//! - [`Engine::tick`] -- advance simulated time by exactly one unit and
//!   credit passive production. The host calls this at its chosen cadence
//!   (conventionally once per second); the engine never measures wall-clock
//!   time and never catches up missed calls.
//! - [`Engine::buy_building`] / [`Engine::buy_upgrade`] -- affordability-
//!   checked purchases. Insufficient funds, unknown ids, and repeat upgrade
//!   purchases are expected gameplay outcomes, reported as `false` with no
//!   state change -- never errors.
//! - [`Engine::level_up`] / [`Engine::can_level_up`] -- the progression
//!   transition and its non-mutating predicate.
//! - [`Engine::snapshot`] / [`Engine::restore`] -- whole-state save
//!   contract; the host persistence adapter owns the bytes.
//!
//! Single-threaded and synchronous: every operation runs to completion,
//! and a multi-threaded host must serialize access to one instance.

use crate::catalog::{BuildingDef, Catalog, LevelDef, UpgradeDef, UpgradeEffect};
use crate::event::{Event, EventBus};
use crate::id::{BuildingId, UpgradeId};
use crate::progression;
use crate::serialize::{SaveHeader, SavedBuilding, SavedGame, SavedUpgrade};
use crate::state::PlayerState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cost growth base: each owned unit multiplies the next unit's cost by this.
pub const COST_GROWTH: f64 = 1.15;

/// Sparks credited per click before multipliers.
pub const BASE_CLICK_VALUE: f64 = 1.0;

/// Affordability tolerance: a balance within this of the cost still buys.
/// Exact-balance purchases must never be rejected by floating rounding.
pub const EPSILON: f64 = 1e-9;

/// Default ring-buffer capacity per event kind.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Whether `balance` covers `cost`, with [`EPSILON`] tolerance.
pub(crate) fn affordable(balance: f64, cost: f64) -> bool {
    balance + EPSILON >= cost
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The core economy engine. See the module docs for the operation list.
#[derive(Debug)]
pub struct Engine {
    /// Immutable definitions, frozen at startup.
    catalog: Catalog,

    /// Mutable player progress. Only touched through engine operations.
    state: PlayerState,

    /// Notification events for presentation layers.
    pub event_bus: EventBus,
}

impl Engine {
    /// Create an engine with fresh default state for the given catalog.
    pub fn new(catalog: Catalog) -> Self {
        let state = PlayerState::new(&catalog);
        Self {
            catalog,
            state,
            event_bus: EventBus::new(DEFAULT_EVENT_CAPACITY),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Direct mutable access to the player state for tests and benches.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    // -----------------------------------------------------------------------
    // Resource accrual
    // -----------------------------------------------------------------------

    /// Credit sparks for one manual click. Always succeeds.
    pub fn click(&mut self) {
        let gained = BASE_CLICK_VALUE * self.click_multiplier();
        self.state.sparks += gained;
        self.event_bus.emit(Event::Clicked {
            sparks_gained: gained,
            tick: self.state.tick,
        });
    }

    /// Advance simulated time by exactly one unit: credit every owned
    /// building's production, scaled by the production multiplier.
    pub fn tick(&mut self) {
        let (sparks_rate, innovation_rate) = self.base_rates();
        let multiplier = self.production_multiplier();
        self.state.sparks += sparks_rate * multiplier;
        self.state.innovation += innovation_rate * multiplier;
        self.state.tick += 1;
    }

    /// Summed per-tick base production over all owned buildings, before
    /// the production multiplier. Returns `(sparks, innovation)`.
    fn base_rates(&self) -> (f64, f64) {
        let mut sparks = 0.0;
        let mut innovation = 0.0;
        for (def, bs) in self.catalog.buildings().iter().zip(&self.state.buildings) {
            sparks += bs.count as f64 * def.sparks_per_tick;
            innovation += bs.count as f64 * def.innovation_per_tick;
        }
        (sparks, innovation)
    }

    /// Sparks credited per tick, after the production multiplier.
    pub fn sparks_per_tick(&self) -> f64 {
        self.base_rates().0 * self.production_multiplier()
    }

    /// Innovation credited per tick, after the production multiplier.
    pub fn innovation_per_tick(&self) -> f64 {
        self.base_rates().1 * self.production_multiplier()
    }

    // -----------------------------------------------------------------------
    // Multipliers
    // -----------------------------------------------------------------------

    /// Purchased upgrade definitions, in catalog order.
    fn purchased_upgrades(&self) -> impl Iterator<Item = &UpgradeDef> {
        self.catalog
            .upgrades()
            .iter()
            .zip(&self.state.upgrades)
            .filter_map(|(def, us)| us.purchased.then_some(def))
    }

    /// Product of every purchased production-multiplier upgrade. 1.0 with none.
    pub fn production_multiplier(&self) -> f64 {
        self.purchased_upgrades()
            .fold(1.0, |acc, def| match def.effect {
                UpgradeEffect::ProductionMultiplier { factor } => acc * factor,
                _ => acc,
            })
    }

    /// Product of every purchased click-multiplier upgrade. 1.0 with none.
    pub fn click_multiplier(&self) -> f64 {
        self.purchased_upgrades()
            .fold(1.0, |acc, def| match def.effect {
                UpgradeEffect::ClickMultiplier { factor } => acc * factor,
                _ => acc,
            })
    }

    /// Product of every purchased cost-reduction upgrade that is global or
    /// targets `building`. 1.0 with none.
    pub fn cost_multiplier(&self, building: BuildingId) -> f64 {
        self.purchased_upgrades()
            .fold(1.0, |acc, def| match def.effect {
                UpgradeEffect::CostReduction { factor, target }
                    if target.is_none() || target == Some(building) =>
                {
                    acc * factor
                }
                _ => acc,
            })
    }

    // -----------------------------------------------------------------------
    // Purchases
    // -----------------------------------------------------------------------

    pub(crate) fn building_cost(&self, id: BuildingId, def: &BuildingDef, count: u32) -> f64 {
        def.base_cost * COST_GROWTH.powi(count as i32) * self.cost_multiplier(id)
    }

    /// Current cost of the next unit of a building:
    /// `base_cost * 1.15^count * cost_multiplier`. `None` for unknown ids.
    pub fn current_cost(&self, id: BuildingId) -> Option<f64> {
        let def = self.catalog.get_building(id)?;
        let count = self.state.buildings[id.0 as usize].count;
        Some(self.building_cost(id, def, count))
    }

    /// Buy exactly one unit of a building with sparks. Returns whether the
    /// purchase happened; on `false` no state changed.
    pub fn buy_building(&mut self, id: BuildingId) -> bool {
        let Some(cost) = self.current_cost(id) else {
            return false;
        };
        if !affordable(self.state.sparks, cost) {
            return false;
        }
        self.state.sparks = (self.state.sparks - cost).max(0.0);
        let entry = &mut self.state.buildings[id.0 as usize];
        entry.count += 1;
        let new_count = entry.count;
        self.event_bus.emit(Event::BuildingPurchased {
            building: id,
            new_count,
            cost,
            tick: self.state.tick,
        });
        true
    }

    /// Buy an upgrade with innovation. Permanent and idempotent: unknown
    /// ids, repeat purchases, and insufficient funds all return `false`
    /// with no state change.
    pub fn buy_upgrade(&mut self, id: UpgradeId) -> bool {
        let Some(def) = self.catalog.get_upgrade(id) else {
            return false;
        };
        let cost = def.cost;
        if self.state.upgrades[id.0 as usize].purchased {
            return false;
        }
        if !affordable(self.state.innovation, cost) {
            return false;
        }
        self.state.innovation = (self.state.innovation - cost).max(0.0);
        self.state.upgrades[id.0 as usize].purchased = true;
        self.event_bus.emit(Event::UpgradePurchased {
            upgrade: id,
            cost,
            tick: self.state.tick,
        });
        true
    }

    // -----------------------------------------------------------------------
    // Progression
    // -----------------------------------------------------------------------

    /// The definition of the player's current level.
    pub fn current_level_def(&self) -> &LevelDef {
        progression::current_level_def(&self.catalog, &self.state)
    }

    /// The next level's definition, or `None` at the catalog maximum.
    pub fn next_level_def(&self) -> Option<&LevelDef> {
        progression::next_level_def(&self.catalog, &self.state)
    }

    /// Whether a level-up would succeed right now. Never mutates.
    pub fn can_level_up(&self) -> bool {
        progression::can_level_up(&self.catalog, &self.state)
    }

    /// Advance to the next level by paying its unlock cost in innovation.
    /// Returns `false` at the catalog maximum or when unaffordable; on
    /// `false` no state changed.
    pub fn level_up(&mut self) -> bool {
        let (number, cost) = match self.next_level_def() {
            Some(next) => (next.number, next.unlock_cost),
            None => return false,
        };
        if !affordable(self.state.innovation, cost) {
            return false;
        }
        self.state.innovation = (self.state.innovation - cost).max(0.0);
        self.state.level += 1;
        self.event_bus.emit(Event::LevelAdvanced {
            level: number,
            cost,
            tick: self.state.tick,
        });
        true
    }

    /// Buildings visible at the current level, in catalog order.
    pub fn available_buildings(&self) -> impl Iterator<Item = (BuildingId, &BuildingDef)> {
        progression::available_buildings(&self.catalog, &self.state)
    }

    /// Upgrades visible at the current level, in catalog order.
    pub fn available_upgrades(&self) -> impl Iterator<Item = (UpgradeId, &UpgradeDef)> {
        progression::available_upgrades(&self.catalog, &self.state)
    }

    // -----------------------------------------------------------------------
    // Snapshot / restore
    // -----------------------------------------------------------------------

    /// Take a point-in-time copy of the whole player state, keyed by stable
    /// catalog keys. `saved_at` is the adapter's wall-clock timestamp; the
    /// engine itself never reads a clock.
    pub fn snapshot(&self, saved_at: u64) -> SavedGame {
        SavedGame {
            header: SaveHeader::new(saved_at),
            sparks: self.state.sparks,
            innovation: self.state.innovation,
            level: self.state.level,
            tick: self.state.tick,
            buildings: self
                .catalog
                .buildings()
                .iter()
                .zip(&self.state.buildings)
                .map(|(def, bs)| SavedBuilding {
                    key: def.key.clone(),
                    count: bs.count,
                })
                .collect(),
            upgrades: self
                .catalog
                .upgrades()
                .iter()
                .zip(&self.state.upgrades)
                .map(|(def, us)| SavedUpgrade {
                    key: def.key.clone(),
                    purchased: us.purchased,
                })
                .collect(),
        }
    }

    /// Replace the whole player state from a save. Unknown keys in the
    /// payload are ignored; catalog entries missing from the payload keep
    /// their defaults. Out-of-range values are clamped back into the
    /// engine's invariants, so even a hostile payload cannot produce a
    /// state the engine cannot run from.
    pub fn restore(&mut self, save: &SavedGame) {
        let mut state = PlayerState::new(&self.catalog);
        state.sparks = save.sparks.max(0.0);
        state.innovation = save.innovation.max(0.0);
        state.level = save
            .level
            .clamp(self.catalog.first_level().number, self.catalog.max_level());
        state.tick = save.tick;
        for sb in &save.buildings {
            if let Some(id) = self.catalog.building_id(&sb.key) {
                state.buildings[id.0 as usize].count = sb.count;
            }
        }
        for su in &save.upgrades {
            if let Some(id) = self.catalog.upgrade_id(&su.key) {
                state.upgrades[id.0 as usize].purchased = su.purchased;
            }
        }
        self.state = state;
    }

    /// Deterministic FNV-1a hash of the player state, for round-trip and
    /// desync checks.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_f64(self.state.sparks);
        hash.write_f64(self.state.innovation);
        hash.write_u32(self.state.level);
        hash.write_u64(self.state.tick);
        for bs in &self.state.buildings {
            hash.write_u32(bs.count);
        }
        for us in &self.state.upgrades {
            hash.write_u32(us.purchased as u32);
        }
        hash.finish()
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of player state.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    /// Feed a u64 into the hash.
    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Feed a u32 into the hash.
    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    /// Feed an f64 into the hash by its bit pattern.
    pub fn write_f64(&mut self, v: f64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::test_utils::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    // -----------------------------------------------------------------------
    // Clicks and ticks
    // -----------------------------------------------------------------------

    #[test]
    fn first_click_credits_one_spark() {
        let mut engine = small_engine();
        engine.click();
        assert!(approx_eq(engine.state().sparks, 1.0));
    }

    #[test]
    fn click_applies_click_multiplier() {
        let mut engine = small_engine();
        let id = engine.catalog().upgrade_id("double_click").unwrap();
        engine.state_mut().innovation = 10.0;
        assert!(engine.buy_upgrade(id));
        engine.click();
        assert!(approx_eq(engine.state().sparks, 2.0));
    }

    #[test]
    fn tick_credits_flat_production_per_unit() {
        let mut engine = small_engine();
        // rocket: 5 sparks and 0.5 innovation per tick per unit.
        let rocket = engine.catalog().building_id("rocket").unwrap();
        engine.state_mut().buildings[rocket.0 as usize].count = 1;
        engine.tick();
        assert!(approx_eq(engine.state().sparks, 5.0));
        assert!(approx_eq(engine.state().innovation, 0.5));
        assert_eq!(engine.state().tick, 1);
    }

    #[test]
    fn tick_applies_production_multiplier() {
        let mut engine = small_engine();
        let rocket = engine.catalog().building_id("rocket").unwrap();
        let boost = engine.catalog().upgrade_id("boost").unwrap();
        engine.state_mut().buildings[rocket.0 as usize].count = 1;
        engine.state_mut().innovation = 100.0;
        assert!(engine.buy_upgrade(boost));
        engine.tick();
        // 5 * 1.5 = 7.5 sparks.
        assert!(approx_eq(engine.state().sparks, 7.5));
    }

    #[test]
    fn tick_with_no_buildings_changes_nothing_but_the_counter() {
        let mut engine = small_engine();
        engine.tick();
        assert_eq!(engine.state().sparks, 0.0);
        assert_eq!(engine.state().innovation, 0.0);
        assert_eq!(engine.state().tick, 1);
    }

    #[test]
    fn rate_queries_match_tick_accrual() {
        let mut engine = small_engine();
        let rocket = engine.catalog().building_id("rocket").unwrap();
        engine.state_mut().buildings[rocket.0 as usize].count = 3;
        let sparks_rate = engine.sparks_per_tick();
        let innovation_rate = engine.innovation_per_tick();
        engine.tick();
        assert!(approx_eq(engine.state().sparks, sparks_rate));
        assert!(approx_eq(engine.state().innovation, innovation_rate));
    }

    // -----------------------------------------------------------------------
    // Costs
    // -----------------------------------------------------------------------

    #[test]
    fn cost_starts_at_base_cost() {
        let engine = small_engine();
        let id = engine.catalog().building_id("sparkler").unwrap();
        assert!(approx_eq(engine.current_cost(id).unwrap(), 10.0));
    }

    #[test]
    fn cost_grows_by_fifteen_percent_per_unit() {
        let mut engine = small_engine();
        let id = engine.catalog().building_id("sparkler").unwrap();
        for count in 0..10u32 {
            engine.state_mut().buildings[id.0 as usize].count = count;
            let current = engine.current_cost(id).unwrap();
            engine.state_mut().buildings[id.0 as usize].count = count + 1;
            let next = engine.current_cost(id).unwrap();
            assert!(approx_eq(next, current * COST_GROWTH));
        }
    }

    #[test]
    fn cost_of_unknown_building_is_none() {
        let engine = small_engine();
        assert!(engine.current_cost(BuildingId(999)).is_none());
    }

    #[test]
    fn targeted_cost_reduction_only_affects_its_target() {
        let mut engine = small_engine();
        let sparkler = engine.catalog().building_id("sparkler").unwrap();
        let rocket = engine.catalog().building_id("rocket").unwrap();
        let discount = engine.catalog().upgrade_id("sparkler_discount").unwrap();
        engine.state_mut().innovation = 50.0;
        assert!(engine.buy_upgrade(discount));
        assert!(approx_eq(engine.current_cost(sparkler).unwrap(), 9.0));
        assert!(approx_eq(engine.current_cost(rocket).unwrap(), 100.0));
    }

    #[test]
    fn global_cost_reduction_affects_every_building() {
        let mut engine = engine_with_global_discount(0.8);
        let a = engine.catalog().building_id("sparkler").unwrap();
        let b = engine.catalog().building_id("rocket").unwrap();
        let discount = engine.catalog().upgrade_id("global_discount").unwrap();
        engine.state_mut().innovation = 1000.0;
        assert!(engine.buy_upgrade(discount));
        assert!(approx_eq(engine.current_cost(a).unwrap(), 10.0 * 0.8));
        assert!(approx_eq(engine.current_cost(b).unwrap(), 100.0 * 0.8));
    }

    // -----------------------------------------------------------------------
    // Buying buildings
    // -----------------------------------------------------------------------

    #[test]
    fn buying_debits_sparks_and_increments_count() {
        let mut engine = small_engine();
        let id = engine.catalog().building_id("sparkler").unwrap();
        engine.state_mut().sparks = 100.0;
        assert!(engine.buy_building(id));
        assert!(approx_eq(engine.state().sparks, 90.0));
        assert_eq!(engine.state().buildings[id.0 as usize].count, 1);
    }

    #[test]
    fn buying_with_exact_balance_succeeds() {
        let mut engine = small_engine();
        let id = engine.catalog().building_id("sparkler").unwrap();
        engine.state_mut().sparks = 10.0;
        assert!(engine.buy_building(id));
        assert_eq!(engine.state().sparks, 0.0);
    }

    #[test]
    fn failed_building_purchase_changes_nothing() {
        let mut engine = small_engine();
        let id = engine.catalog().building_id("sparkler").unwrap();
        engine.state_mut().sparks = 9.99;
        let before = engine.state_hash();
        assert!(!engine.buy_building(id));
        assert_eq!(engine.state_hash(), before);
    }

    #[test]
    fn buying_unknown_building_is_a_no_op() {
        let mut engine = small_engine();
        engine.state_mut().sparks = 1_000_000.0;
        let before = engine.state_hash();
        assert!(!engine.buy_building(BuildingId(999)));
        assert_eq!(engine.state_hash(), before);
    }

    #[test]
    fn each_purchase_raises_the_next_cost() {
        let mut engine = small_engine();
        let id = engine.catalog().building_id("sparkler").unwrap();
        engine.state_mut().sparks = 1_000.0;
        assert!(engine.buy_building(id));
        assert!(engine.buy_building(id));
        // 10 + 10*1.15 = 21.5 spent.
        assert!(approx_eq(engine.state().sparks, 1_000.0 - 21.5));
        assert_eq!(engine.state().buildings[id.0 as usize].count, 2);
    }

    // -----------------------------------------------------------------------
    // Buying upgrades
    // -----------------------------------------------------------------------

    #[test]
    fn upgrade_purchase_is_idempotent() {
        let mut engine = small_engine();
        let id = engine.catalog().upgrade_id("double_click").unwrap();
        engine.state_mut().innovation = 100.0;
        assert!(engine.buy_upgrade(id));
        let after_first = engine.state_hash();
        assert!(!engine.buy_upgrade(id));
        assert_eq!(engine.state_hash(), after_first);
        assert!(approx_eq(engine.state().innovation, 90.0));
    }

    #[test]
    fn unaffordable_upgrade_is_a_no_op() {
        let mut engine = small_engine();
        let id = engine.catalog().upgrade_id("double_click").unwrap();
        engine.state_mut().innovation = 5.0;
        assert!(!engine.buy_upgrade(id));
        assert!(!engine.state().upgrades[id.0 as usize].purchased);
        assert!(approx_eq(engine.state().innovation, 5.0));
    }

    #[test]
    fn unknown_upgrade_is_a_no_op() {
        let mut engine = small_engine();
        let before = engine.state_hash();
        assert!(!engine.buy_upgrade(UpgradeId(999)));
        assert_eq!(engine.state_hash(), before);
    }

    // -----------------------------------------------------------------------
    // Leveling
    // -----------------------------------------------------------------------

    #[test]
    fn level_up_debits_exact_unlock_cost() {
        let mut engine = small_engine();
        engine.state_mut().innovation = 10.0;
        assert!(engine.can_level_up());
        assert!(engine.level_up());
        assert_eq!(engine.state().level, 2);
        assert!(engine.state().innovation.abs() < 1e-9);
    }

    #[test]
    fn level_up_fails_when_unaffordable() {
        let mut engine = small_engine();
        engine.state_mut().innovation = 9.0;
        assert!(!engine.can_level_up());
        assert!(!engine.level_up());
        assert_eq!(engine.state().level, 1);
        assert!(approx_eq(engine.state().innovation, 9.0));
    }

    #[test]
    fn level_up_unreachable_at_catalog_maximum() {
        let mut engine = small_engine();
        engine.state_mut().innovation = 1_000_000.0;
        while engine.level_up() {}
        assert_eq!(engine.state().level, engine.catalog().max_level());
        assert!(engine.next_level_def().is_none());
        assert!(!engine.can_level_up());
        assert!(!engine.level_up());
        assert_eq!(engine.state().level, engine.catalog().max_level());
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    #[test]
    fn operations_emit_their_events() {
        let mut engine = small_engine();
        engine.state_mut().sparks = 100.0;
        engine.state_mut().innovation = 100.0;
        let sparkler = engine.catalog().building_id("sparkler").unwrap();
        let upgrade = engine.catalog().upgrade_id("double_click").unwrap();

        engine.click();
        engine.buy_building(sparkler);
        engine.buy_upgrade(upgrade);
        engine.level_up();

        assert_eq!(engine.event_bus.buffered_count(EventKind::Clicked), 1);
        assert_eq!(
            engine.event_bus.buffered_count(EventKind::BuildingPurchased),
            1
        );
        assert_eq!(
            engine.event_bus.buffered_count(EventKind::UpgradePurchased),
            1
        );
        assert_eq!(engine.event_bus.buffered_count(EventKind::LevelAdvanced), 1);
    }

    #[test]
    fn failed_operations_emit_nothing() {
        let mut engine = small_engine();
        let sparkler = engine.catalog().building_id("sparkler").unwrap();
        engine.buy_building(sparkler);
        engine.level_up();
        assert_eq!(
            engine.event_bus.buffered_count(EventKind::BuildingPurchased),
            0
        );
        assert_eq!(engine.event_bus.buffered_count(EventKind::LevelAdvanced), 0);
    }

    // -----------------------------------------------------------------------
    // Snapshot / restore
    // -----------------------------------------------------------------------

    #[test]
    fn restore_reproduces_snapshot_exactly() {
        let mut engine = small_engine();
        let sparkler = engine.catalog().building_id("sparkler").unwrap();
        let upgrade = engine.catalog().upgrade_id("double_click").unwrap();
        engine.state_mut().sparks = 500.0;
        engine.state_mut().innovation = 50.0;
        engine.buy_building(sparkler);
        engine.buy_building(sparkler);
        engine.buy_upgrade(upgrade);
        engine.level_up();
        engine.tick();

        let save = engine.snapshot(1_700_000_000);
        let hash = engine.state_hash();

        let mut fresh = small_engine();
        fresh.restore(&save);
        assert_eq!(fresh.state(), engine.state());
        assert_eq!(fresh.state_hash(), hash);
    }

    #[test]
    fn restore_ignores_unknown_keys() {
        let mut engine = small_engine();
        let mut save = engine.snapshot(0);
        save.buildings.push(SavedBuilding {
            key: "removed_building".to_string(),
            count: 99,
        });
        save.upgrades.push(SavedUpgrade {
            key: "removed_upgrade".to_string(),
            purchased: true,
        });
        engine.restore(&save);
        let total: u32 = engine.state().buildings.iter().map(|b| b.count).sum();
        assert_eq!(total, 0);
        assert!(engine.state().upgrades.iter().all(|u| !u.purchased));
    }

    #[test]
    fn restore_defaults_missing_entries() {
        let mut engine = small_engine();
        let sparkler = engine.catalog().building_id("sparkler").unwrap();
        engine.state_mut().sparks = 100.0;
        engine.buy_building(sparkler);

        let mut save = engine.snapshot(0);
        // Simulate a save written before these catalog entries existed.
        save.buildings.clear();
        save.upgrades.clear();
        engine.restore(&save);
        assert_eq!(engine.state().buildings[sparkler.0 as usize].count, 0);
    }

    #[test]
    fn restore_clamps_hostile_values() {
        let mut engine = small_engine();
        let mut save = engine.snapshot(0);
        save.sparks = -100.0;
        save.innovation = f64::NEG_INFINITY;
        save.level = 999;
        engine.restore(&save);
        assert_eq!(engine.state().sparks, 0.0);
        assert_eq!(engine.state().innovation, 0.0);
        assert_eq!(engine.state().level, engine.catalog().max_level());

        save.level = 0;
        engine.restore(&save);
        assert_eq!(engine.state().level, 1);
    }

    // -----------------------------------------------------------------------
    // State hash
    // -----------------------------------------------------------------------

    #[test]
    fn state_hash_is_deterministic() {
        let a = small_engine();
        let b = small_engine();
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn state_hash_changes_with_state() {
        let mut engine = small_engine();
        let before = engine.state_hash();
        engine.click();
        assert_ne!(engine.state_hash(), before);
    }
}
