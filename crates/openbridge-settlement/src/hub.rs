//! The bridge protocol orchestrator.
//!
//! [`BridgeHub`] owns all settlement state for one ledger's side of the
//! bridge and is the only mutation path into it. Every operation is a
//! single atomic step: all validation (amounts, quorum, replay key, pool
//! existence, reserve sufficiency) happens before the first mutation, so
//! a failing operation leaves every structure untouched.
//!
//! Operations that move assets are wrapped in the reentrancy guard: a
//! transfer callback cannot invoke another settlement operation before
//! the current one finishes.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use openbridge_accounting::{accrual, fees, shares};
use openbridge_quorum::{verify_quorum, ReleaseIntent, SignerApproval, SignerRegistry};
use openbridge_types::{
    constants::NATIVE_ASSET, AccrualPool, Address, Asset, BridgeConfig, BridgeError, BridgeEvent,
    ChainId, DepositKey, DepositNumber, EventRecord, FeeSchedule, FundingSource, LiquidityPool,
    PoolKind, PoolSelection, Result, StakePoolKind,
};

use crate::{
    deposit_ledger::DepositLedger,
    reentrancy::ReentrancyGuard,
    replay::ReleasedKeys,
    token_map::TokenMap,
    vault::{Vault, FEE_SINK_ACCOUNT, RESERVE_ACCOUNT, REWARDS_ACCOUNT},
};

/// One ledger's side of the bridge: deposit escrow, quorum-verified
/// release, pooled liquidity, and the accrual pools.
pub struct BridgeHub {
    config: BridgeConfig,
    /// Holder of the admin capability for mappings, pools, and fees.
    owner: Address,
    registry: SignerRegistry,
    fees: FeeSchedule,
    ledger: DepositLedger,
    released: ReleasedKeys,
    token_map: TokenMap,
    vault: Vault,
    liquidity_pools: HashMap<Asset, LiquidityPool>,
    accrual_pools: HashMap<(StakePoolKind, Asset), AccrualPool>,
    guard: ReentrancyGuard,
    events: Vec<EventRecord>,
}

impl BridgeHub {
    /// Create a hub for one ledger with the given admin owner and
    /// signer registry.
    #[must_use]
    pub fn new(config: BridgeConfig, owner: Address, registry: SignerRegistry) -> Self {
        let fees = FeeSchedule::new(config.fees.bridge_ppm, config.fees.withdrawal_ppm);
        let ledger = DepositLedger::new(config.chain_id);
        Self {
            config,
            owner,
            registry,
            fees,
            ledger,
            released: ReleasedKeys::new(),
            token_map: TokenMap::new(),
            vault: Vault::new(),
            liquidity_pools: HashMap::new(),
            accrual_pools: HashMap::new(),
            guard: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    // =====================================================================
    // Deposit
    // =====================================================================

    /// Escrow `amount` of `asset` for release on `target_chain`.
    /// Returns the assigned deposit number (the relay needs it for the
    /// release digest on the target ledger).
    pub fn deposit_asset(
        &mut self,
        asset: impl Into<Asset>,
        amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> Result<DepositNumber> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_deposit(asset, amount, receiver, target_chain))
    }

    /// Escrow the ledger's native coin for release on `target_chain`.
    pub fn deposit_native(
        &mut self,
        amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> Result<DepositNumber> {
        self.with_guard(|hub| {
            hub.do_deposit(NATIVE_ASSET.to_string(), amount, receiver, target_chain)
        })
    }

    fn do_deposit(
        &mut self,
        asset: Asset,
        amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> Result<DepositNumber> {
        require_positive(amount)?;
        // No fee at deposit time; the bridge fee is applied at release
        // against the bridged amount.
        self.vault.deposit(RESERVE_ACCOUNT, &asset, amount);
        Ok(self.record_outbound(asset, amount, receiver, target_chain))
    }

    /// Shared tail of the deposit flow: assign the sequence number and
    /// emit the event. Used by deposits and by withdraw-and-bridge.
    fn record_outbound(
        &mut self,
        asset: Asset,
        amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> DepositNumber {
        let number = self
            .ledger
            .record(asset.clone(), amount, receiver, target_chain);
        let key = DepositKey::new(self.config.chain_id, number);
        info!(
            key = %key,
            asset = %asset,
            amount = %amount,
            receiver = %receiver,
            target = %target_chain,
            "Deposit escrowed"
        );
        self.emit(BridgeEvent::DepositRecorded {
            key,
            asset,
            amount,
            receiver,
            target_chain,
        });
        number
    }

    // =====================================================================
    // Release
    // =====================================================================

    /// Deliver a quorum-authorized release. Returns the net amount paid
    /// to the receiver (`amount` minus the bridge fee).
    ///
    /// The canonical digest is recomputed from the supplied parameters;
    /// quorum, replay, and reserve checks all pass before any transfer.
    pub fn release_asset(
        &mut self,
        approvals: &[SignerApproval],
        receiver: Address,
        source_asset: impl Into<Asset>,
        amount: Decimal,
        source_chain: ChainId,
        number: DepositNumber,
    ) -> Result<Decimal> {
        let source_asset = source_asset.into();
        self.with_guard(|hub| {
            hub.do_release(approvals, receiver, source_asset, amount, source_chain, number)
        })
    }

    /// Deliver a quorum-authorized release of the native coin.
    pub fn release_native(
        &mut self,
        approvals: &[SignerApproval],
        receiver: Address,
        amount: Decimal,
        source_chain: ChainId,
        number: DepositNumber,
    ) -> Result<Decimal> {
        self.with_guard(|hub| {
            hub.do_release(
                approvals,
                receiver,
                NATIVE_ASSET.to_string(),
                amount,
                source_chain,
                number,
            )
        })
    }

    fn do_release(
        &mut self,
        approvals: &[SignerApproval],
        receiver: Address,
        source_asset: Asset,
        amount: Decimal,
        source_chain: ChainId,
        number: DepositNumber,
    ) -> Result<Decimal> {
        require_positive(amount)?;

        let intent = ReleaseIntent {
            receiver,
            source_asset,
            amount,
            source_chain,
            number,
            local_chain: self.config.chain_id,
        };
        verify_quorum(&self.registry, &intent.digest(), approvals)?;

        let key = intent.deposit_key();
        if self.released.is_released(&key) {
            return Err(BridgeError::ReplayedDeposit(key));
        }

        let asset = self.token_map.resolve(&intent.source_asset);
        let fee = fees::bridge_fee(&self.fees, &asset, amount)?;
        let net = amount - fee;

        let reserve = self.vault.balance(RESERVE_ACCOUNT, &asset);
        if reserve < amount {
            return Err(BridgeError::InsufficientBalance {
                needed: amount,
                available: reserve,
            });
        }

        // Every check has passed; the mutations below cannot fail, so the
        // key insert and the transfers land in the same atomic step.
        self.released.mark_released(key)?;
        self.vault
            .transfer(RESERVE_ACCOUNT, FEE_SINK_ACCOUNT, &asset, fee)?;
        self.vault.withdraw(RESERVE_ACCOUNT, &asset, net)?;

        info!(
            key = %key,
            asset = %asset,
            net = %net,
            fee = %fee,
            receiver = %receiver,
            "Release delivered"
        );
        self.emit(BridgeEvent::Released {
            key,
            asset,
            amount,
            fee,
            receiver,
        });
        Ok(net)
    }

    /// Bridge fee that a release of `amount` of `asset` would pay.
    /// Read-only; resolves the asset through the token mapping exactly
    /// like the release path does.
    pub fn get_bridge_fee_quote(&self, asset: &str, amount: Decimal) -> Result<Decimal> {
        let asset = self.token_map.resolve(asset);
        fees::bridge_fee(&self.fees, &asset, amount)
    }

    // =====================================================================
    // Liquidity
    // =====================================================================

    /// Add liquidity, minting shares at the current redemption rate.
    /// The pool is created lazily on the first add for an asset.
    /// Returns the shares minted.
    pub fn add_liquidity(
        &mut self,
        provider: Address,
        asset: impl Into<Asset>,
        amount: Decimal,
    ) -> Result<Decimal> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_add_liquidity(provider, asset, amount))
    }

    fn do_add_liquidity(
        &mut self,
        provider: Address,
        asset: Asset,
        amount: Decimal,
    ) -> Result<Decimal> {
        require_positive(amount)?;
        if !self.liquidity_pools.contains_key(&asset) {
            self.liquidity_pools
                .insert(asset.clone(), LiquidityPool::new(asset.clone()));
            self.emit(BridgeEvent::PoolCreated {
                asset: asset.clone(),
                kind: PoolKind::Liquidity,
            });
        }
        let pool = self
            .liquidity_pools
            .get_mut(&asset)
            .ok_or_else(|| BridgeError::UnknownAsset(asset.clone()))?;
        let minted = shares::shares_for_deposit(pool.reserve, pool.share_supply, amount)?;
        pool.reserve += amount;
        pool.grant_shares(provider, minted);

        self.vault.deposit(RESERVE_ACCOUNT, &asset, amount);
        debug!(
            provider = %provider,
            asset = %asset,
            amount = %amount,
            minted = %minted,
            "Liquidity added"
        );
        self.emit(BridgeEvent::LiquidityAdded {
            provider,
            asset,
            amount,
            shares_minted: minted,
        });
        Ok(minted)
    }

    /// Burn `share_amount` shares for principal at the current rate,
    /// minus the withdrawal fee. Returns the net amount paid out.
    pub fn withdraw_liquidity(
        &mut self,
        provider: Address,
        asset: impl Into<Asset>,
        share_amount: Decimal,
    ) -> Result<Decimal> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_withdraw_liquidity(provider, asset, share_amount))
    }

    fn do_withdraw_liquidity(
        &mut self,
        provider: Address,
        asset: Asset,
        share_amount: Decimal,
    ) -> Result<Decimal> {
        let (gross, fee, net) = self.quote_withdrawal(provider, &asset, share_amount)?;
        self.apply_withdrawal(provider, &asset, share_amount, gross, fee)?;
        self.vault.withdraw(RESERVE_ACCOUNT, &asset, net)?;
        self.emit(BridgeEvent::LiquidityRemoved {
            provider,
            asset,
            shares_burned: share_amount,
            amount_out: net,
            fee,
        });
        Ok(net)
    }

    /// Burn shares for principal, apply the withdrawal fee, and feed the
    /// net amount straight into the deposit flow toward another ledger.
    /// Returns the assigned deposit number.
    pub fn withdraw_liquidity_to_another_ledger(
        &mut self,
        provider: Address,
        asset: impl Into<Asset>,
        share_amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> Result<DepositNumber> {
        let asset = asset.into();
        self.with_guard(|hub| {
            hub.do_withdraw_and_bridge(provider, asset, share_amount, receiver, target_chain)
        })
    }

    fn do_withdraw_and_bridge(
        &mut self,
        provider: Address,
        asset: Asset,
        share_amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> Result<DepositNumber> {
        let (gross, fee, net) = self.quote_withdrawal(provider, &asset, share_amount)?;
        require_positive(net)?;
        self.apply_withdrawal(provider, &asset, share_amount, gross, fee)?;
        self.emit(BridgeEvent::LiquidityRemoved {
            provider,
            asset: asset.clone(),
            shares_burned: share_amount,
            amount_out: net,
            fee,
        });
        // The net principal stays escrowed in the reserve and re-enters
        // the deposit flow toward the target ledger.
        Ok(self.record_outbound(asset, net, receiver, target_chain))
    }

    /// Read-only withdrawal projection: (gross, fee, net). Performs every
    /// check the mutation needs, so a quoted withdrawal cannot fail
    /// halfway through applying.
    fn quote_withdrawal(
        &self,
        provider: Address,
        asset: &Asset,
        share_amount: Decimal,
    ) -> Result<(Decimal, Decimal, Decimal)> {
        let pool = self
            .liquidity_pools
            .get(asset)
            .ok_or_else(|| BridgeError::UnknownAsset(asset.clone()))?;
        let held = pool.share_balance(provider);
        if share_amount > held {
            return Err(BridgeError::InsufficientLiquidity {
                needed: share_amount,
                available: held,
            });
        }
        let gross = shares::amount_for_shares(pool.reserve, pool.share_supply, share_amount)?;
        let fee = fees::withdrawal_fee(&self.fees, asset, gross)?;

        let reserve = self.vault.balance(RESERVE_ACCOUNT, asset);
        if reserve < gross {
            return Err(BridgeError::InsufficientBalance {
                needed: gross,
                available: reserve,
            });
        }
        Ok((gross, fee, gross - fee))
    }

    fn apply_withdrawal(
        &mut self,
        provider: Address,
        asset: &Asset,
        share_amount: Decimal,
        gross: Decimal,
        fee: Decimal,
    ) -> Result<()> {
        let pool = self
            .liquidity_pools
            .get_mut(asset)
            .ok_or_else(|| BridgeError::UnknownAsset(asset.clone()))?;
        pool.burn_shares(provider, share_amount)?;
        pool.reserve -= gross;
        self.vault
            .transfer(RESERVE_ACCOUNT, FEE_SINK_ACCOUNT, asset, fee)?;
        debug!(
            provider = %provider,
            asset = %asset,
            shares = %share_amount,
            gross = %gross,
            fee = %fee,
            "Liquidity withdrawn"
        );
        Ok(())
    }

    // =====================================================================
    // Staking (mining pools, farms, reward pools)
    // =====================================================================

    /// Stake into an accrual pool. Settles any pending reward first and
    /// returns it.
    pub fn stake(
        &mut self,
        kind: StakePoolKind,
        staker: Address,
        asset: impl Into<Asset>,
        amount: Decimal,
        now: u64,
    ) -> Result<Decimal> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_stake(kind, staker, asset, amount, now))
    }

    fn do_stake(
        &mut self,
        kind: StakePoolKind,
        staker: Address,
        asset: Asset,
        amount: Decimal,
        now: u64,
    ) -> Result<Decimal> {
        let pool = self.pool_mut(kind, &asset)?;
        let reward = accrual::stake(pool, staker, amount, now)?;
        let reward_asset = pool.reward_asset.clone();

        self.vault.deposit(RESERVE_ACCOUNT, &asset, amount);
        self.pay_reward(kind, &reward_asset, staker, reward)?;
        self.emit(BridgeEvent::StakeAdded {
            staker,
            kind,
            asset,
            amount,
            reward_paid: reward,
        });
        Ok(reward)
    }

    /// Unstake from an accrual pool. Settles the pending reward and pays
    /// out the principal. Returns the reward settled.
    pub fn unstake(
        &mut self,
        kind: StakePoolKind,
        staker: Address,
        asset: impl Into<Asset>,
        amount: Decimal,
        now: u64,
    ) -> Result<Decimal> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_unstake(kind, staker, asset, amount, now))
    }

    fn do_unstake(
        &mut self,
        kind: StakePoolKind,
        staker: Address,
        asset: Asset,
        amount: Decimal,
        now: u64,
    ) -> Result<Decimal> {
        // Pre-validate against the position and the reserve so the
        // accrual mutation below cannot be followed by a failing payout.
        let pool = self
            .accrual_pools
            .get(&(kind, asset.clone()))
            .ok_or_else(|| BridgeError::UnknownAsset(asset.clone()))?;
        let staked = pool.staked_amount(staker);
        if amount > staked {
            return Err(BridgeError::InsufficientStake {
                needed: amount,
                available: staked,
            });
        }
        let reserve = self.vault.balance(RESERVE_ACCOUNT, &asset);
        if reserve < amount {
            return Err(BridgeError::InsufficientBalance {
                needed: amount,
                available: reserve,
            });
        }

        let pool = self.pool_mut(kind, &asset)?;
        let reward = accrual::unstake(pool, staker, amount, now)?;
        let reward_asset = pool.reward_asset.clone();

        self.vault.withdraw(RESERVE_ACCOUNT, &asset, amount)?;
        self.pay_reward(kind, &reward_asset, staker, reward)?;
        self.emit(BridgeEvent::StakeWithdrawn {
            staker,
            kind,
            asset,
            amount,
            reward_paid: reward,
        });
        Ok(reward)
    }

    /// Harvest pending rewards without touching the stake. Returns the
    /// reward paid.
    pub fn harvest(
        &mut self,
        kind: StakePoolKind,
        staker: Address,
        asset: impl Into<Asset>,
        now: u64,
    ) -> Result<Decimal> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_harvest(kind, staker, asset, now))
    }

    fn do_harvest(
        &mut self,
        kind: StakePoolKind,
        staker: Address,
        asset: Asset,
        now: u64,
    ) -> Result<Decimal> {
        let pool = self.pool_mut(kind, &asset)?;
        let reward = accrual::harvest(pool, staker, now);
        let reward_asset = pool.reward_asset.clone();

        self.pay_reward(kind, &reward_asset, staker, reward)?;
        self.emit(BridgeEvent::RewardsHarvested {
            staker,
            kind,
            asset,
            reward,
        });
        Ok(reward)
    }

    /// Read-only pending-reward projection as of `now`.
    pub fn pending_reward(
        &self,
        kind: StakePoolKind,
        staker: Address,
        asset: &str,
        now: u64,
    ) -> Result<Decimal> {
        let pool = self
            .accrual_pools
            .get(&(kind, asset.to_string()))
            .ok_or_else(|| BridgeError::UnknownAsset(asset.to_string()))?;
        Ok(accrual::pending_reward(pool, staker, now))
    }

    /// Deposit reward funds into an asset's reward pool. The balance is
    /// distributed over stakers at the next accrual point.
    pub fn fund_rewards(&mut self, asset: impl Into<Asset>, amount: Decimal) -> Result<()> {
        let asset = asset.into();
        self.with_guard(|hub| hub.do_fund_rewards(asset, amount))
    }

    fn do_fund_rewards(&mut self, asset: Asset, amount: Decimal) -> Result<()> {
        require_positive(amount)?;
        let pool = self
            .accrual_pools
            .get_mut(&(StakePoolKind::Reward, asset.clone()))
            .ok_or_else(|| BridgeError::UnknownAsset(asset.clone()))?;
        let reward_asset = pool.reward_asset.clone();
        pool.funding.fund(amount);
        self.vault.deposit(REWARDS_ACCOUNT, &reward_asset, amount);
        info!(asset = %asset, amount = %amount, "Reward pool funded");
        Ok(())
    }

    fn pool_mut(&mut self, kind: StakePoolKind, asset: &Asset) -> Result<&mut AccrualPool> {
        self.accrual_pools
            .get_mut(&(kind, asset.clone()))
            .ok_or_else(|| BridgeError::UnknownAsset(asset.clone()))
    }

    /// Pay a settled reward out to the staker.
    ///
    /// Reward-pool payouts draw from the deposited reward funds; emission
    /// rewards are minted by the external emission collaborator, so the
    /// vault has nothing to move for them.
    fn pay_reward(
        &mut self,
        kind: StakePoolKind,
        reward_asset: &str,
        staker: Address,
        reward: Decimal,
    ) -> Result<()> {
        if reward.is_zero() {
            return Ok(());
        }
        debug!(staker = %staker, reward_asset, reward = %reward, "Reward paid");
        match kind {
            StakePoolKind::Reward => self.vault.withdraw(REWARDS_ACCOUNT, reward_asset, reward),
            StakePoolKind::Mining | StakePoolKind::Farm => Ok(()),
        }
    }

    // =====================================================================
    // Pool creation and administration
    // =====================================================================

    /// Per-flag initialization of the pools for a newly listed asset.
    /// Fails if any requested pool already exists; accounting state is
    /// never reset. Owner-gated.
    pub fn create_pools(
        &mut self,
        caller: Address,
        asset: impl Into<Asset>,
        selection: PoolSelection,
        now: u64,
    ) -> Result<()> {
        let asset = asset.into();
        self.require_owner(caller)?;

        // Check every requested pool before creating any, so a partial
        // selection failure creates nothing.
        if selection.liquidity && self.liquidity_pools.contains_key(&asset) {
            return Err(BridgeError::PoolAlreadyExists {
                asset,
                kind: PoolKind::Liquidity,
            });
        }
        for kind in [
            StakePoolKind::Mining,
            StakePoolKind::Farm,
            StakePoolKind::Reward,
        ] {
            if selected(selection, kind) && self.accrual_pools.contains_key(&(kind, asset.clone()))
            {
                return Err(BridgeError::PoolAlreadyExists {
                    asset,
                    kind: kind.as_pool_kind(),
                });
            }
        }

        if selection.liquidity {
            self.liquidity_pools
                .insert(asset.clone(), LiquidityPool::new(asset.clone()));
            self.emit(BridgeEvent::PoolCreated {
                asset: asset.clone(),
                kind: PoolKind::Liquidity,
            });
        }
        let rewards = self.config.rewards.clone();
        if selection.mining {
            self.accrual_pools.insert(
                (StakePoolKind::Mining, asset.clone()),
                AccrualPool::new(
                    asset.clone(),
                    rewards.reward_asset.clone(),
                    FundingSource::Emission {
                        rate_per_sec: rewards.mining_rate_per_sec,
                    },
                    now,
                ),
            );
            self.emit(BridgeEvent::PoolCreated {
                asset: asset.clone(),
                kind: PoolKind::Mining,
            });
        }
        if selection.farm {
            self.accrual_pools.insert(
                (StakePoolKind::Farm, asset.clone()),
                AccrualPool::new(
                    asset.clone(),
                    rewards.reward_asset.clone(),
                    FundingSource::Emission {
                        rate_per_sec: rewards.farm_rate_per_sec,
                    },
                    now,
                ),
            );
            self.emit(BridgeEvent::PoolCreated {
                asset: asset.clone(),
                kind: PoolKind::Farm,
            });
        }
        if selection.reward {
            self.accrual_pools.insert(
                (StakePoolKind::Reward, asset.clone()),
                AccrualPool::new(
                    asset.clone(),
                    rewards.reward_asset,
                    FundingSource::RewardBalance {
                        available: Decimal::ZERO,
                    },
                    now,
                ),
            );
            self.emit(BridgeEvent::PoolCreated {
                asset,
                kind: PoolKind::Reward,
            });
        }
        Ok(())
    }

    /// Map a source-ledger asset to a local asset. Owner-gated.
    pub fn add_token_mapping(
        &mut self,
        caller: Address,
        source_asset: impl Into<Asset>,
        local_asset: impl Into<Asset>,
    ) -> Result<()> {
        self.require_owner(caller)?;
        let source_asset = source_asset.into();
        let local_asset = local_asset.into();
        self.token_map.add(source_asset.clone(), local_asset.clone());
        self.emit(BridgeEvent::MappingAdded {
            source_asset,
            local_asset,
        });
        Ok(())
    }

    /// Remove a token mapping. Owner-gated.
    pub fn remove_token_mapping(&mut self, caller: Address, source_asset: &str) -> Result<()> {
        self.require_owner(caller)?;
        self.token_map.remove(source_asset)?;
        self.emit(BridgeEvent::MappingRemoved {
            source_asset: source_asset.to_string(),
        });
        Ok(())
    }

    /// Override the bridge fee rate for an asset. Owner-gated.
    pub fn set_bridge_fee(
        &mut self,
        caller: Address,
        asset: impl Into<Asset>,
        ppm: u64,
    ) -> Result<()> {
        self.require_owner(caller)?;
        let asset = asset.into();
        info!(asset = %asset, ppm, "Bridge fee override set");
        self.fees.set_bridge_override(asset, ppm);
        Ok(())
    }

    /// Override the withdrawal fee rate for an asset. Owner-gated.
    pub fn set_withdrawal_fee(
        &mut self,
        caller: Address,
        asset: impl Into<Asset>,
        ppm: u64,
    ) -> Result<()> {
        self.require_owner(caller)?;
        let asset = asset.into();
        info!(asset = %asset, ppm, "Withdrawal fee override set");
        self.fees.set_withdrawal_override(asset, ppm);
        Ok(())
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(BridgeError::Unauthorized);
        }
        Ok(())
    }

    // =====================================================================
    // Introspection
    // =====================================================================

    /// This deployment's chain id.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.config.chain_id
    }

    /// Events emitted since the last drain.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Take the pending event journal (the relay's read interface).
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    /// The asset custody vault.
    #[must_use]
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// The outbound deposit ledger.
    #[must_use]
    pub fn deposit_ledger(&self) -> &DepositLedger {
        &self.ledger
    }

    /// The used-deposit-key set.
    #[must_use]
    pub fn released_keys(&self) -> &ReleasedKeys {
        &self.released
    }

    /// A liquidity pool, if one exists for the asset.
    #[must_use]
    pub fn liquidity_pool(&self, asset: &str) -> Option<&LiquidityPool> {
        self.liquidity_pools.get(asset)
    }

    /// An accrual pool, if one exists for the (kind, asset) pair.
    #[must_use]
    pub fn accrual_pool(&self, kind: StakePoolKind, asset: &str) -> Option<&AccrualPool> {
        self.accrual_pools.get(&(kind, asset.to_string()))
    }

    /// Audit hook: verify vault conservation for an asset.
    pub fn verify_reserve(&self, asset: &str) -> Result<()> {
        self.vault.verify_supply(asset)
    }

    fn emit(&mut self, event: BridgeEvent) {
        debug!(event = event.name(), "Event emitted");
        self.events.push(EventRecord::new(event));
    }

    fn with_guard<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.guard.enter()?;
        let result = f(self);
        self.guard.exit();
        result
    }
}

fn selected(selection: PoolSelection, kind: StakePoolKind) -> bool {
    match kind {
        StakePoolKind::Mining => selection.mining,
        StakePoolKind::Farm => selection.farm,
        StakePoolKind::Reward => selection.reward,
    }
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount.is_zero() || amount.is_sign_negative() {
        return Err(BridgeError::InvalidAmount {
            reason: format!("amount must be positive, got {amount}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openbridge_types::SignerId;

    const TARGET: ChainId = ChainId(7);
    const T0: u64 = 1_700_000_000;

    fn owner() -> Address {
        Address([0xAA; 32])
    }

    fn make_hub() -> BridgeHub {
        let registry =
            SignerRegistry::new([SignerId([1; 32]), SignerId([2; 32]), SignerId([3; 32])], 2)
                .unwrap();
        BridgeHub::new(BridgeConfig::new(ChainId(1)), owner(), registry)
    }

    #[test]
    fn deposit_assigns_numbers_and_emits() {
        let mut hub = make_hub();
        let receiver = Address::random();

        let n1 = hub
            .deposit_asset("USDC", Decimal::new(100, 0), receiver, TARGET)
            .unwrap();
        let n2 = hub
            .deposit_asset("USDC", Decimal::new(200, 0), receiver, TARGET)
            .unwrap();
        assert_eq!(n1, DepositNumber(1));
        assert_eq!(n2, DepositNumber(2));

        let events = hub.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0].event,
            BridgeEvent::DepositRecorded { key, .. } if key.number == DepositNumber(1)
        ));

        // Principal is escrowed in the reserve.
        assert_eq!(
            hub.vault().balance(RESERVE_ACCOUNT, "USDC"),
            Decimal::new(300, 0)
        );
        hub.verify_reserve("USDC").unwrap();
    }

    #[test]
    fn deposit_native_uses_reserved_asset() {
        let mut hub = make_hub();
        hub.deposit_native(Decimal::new(5, 0), Address::random(), TARGET)
            .unwrap();
        assert_eq!(
            hub.vault().balance(RESERVE_ACCOUNT, NATIVE_ASSET),
            Decimal::new(5, 0)
        );
    }

    #[test]
    fn zero_deposit_rejected() {
        let mut hub = make_hub();
        let err = hub
            .deposit_asset("USDC", Decimal::ZERO, Address::random(), TARGET)
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
        assert!(hub.deposit_ledger().is_empty());
    }

    #[test]
    fn create_pools_is_idempotent_per_flag() {
        let mut hub = make_hub();
        hub.create_pools(owner(), "USDC", PoolSelection::all(), T0)
            .unwrap();

        let err = hub
            .create_pools(owner(), "USDC", PoolSelection::all(), T0)
            .unwrap_err();
        assert!(matches!(err, BridgeError::PoolAlreadyExists { .. }));

        // A different asset is unaffected.
        hub.create_pools(owner(), "WETH", PoolSelection::all(), T0)
            .unwrap();
    }

    #[test]
    fn create_pools_failure_creates_nothing() {
        let mut hub = make_hub();
        hub.create_pools(owner(), "USDC", PoolSelection::liquidity_only(), T0)
            .unwrap();

        // Liquidity already exists, so the whole call must fail without
        // creating the mining pool.
        let err = hub
            .create_pools(owner(), "USDC", PoolSelection::all(), T0)
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::PoolAlreadyExists {
                kind: PoolKind::Liquidity,
                ..
            }
        ));
        assert!(hub.accrual_pool(StakePoolKind::Mining, "USDC").is_none());
    }

    #[test]
    fn pool_creation_does_not_reset_accounting() {
        let mut hub = make_hub();
        hub.create_pools(owner(), "USDC", PoolSelection::all(), T0)
            .unwrap();
        hub.stake(
            StakePoolKind::Mining,
            Address::random(),
            "USDC",
            Decimal::new(50, 0),
            T0,
        )
        .unwrap();

        let _ = hub.create_pools(owner(), "USDC", PoolSelection::all(), T0);
        assert_eq!(
            hub.accrual_pool(StakePoolKind::Mining, "USDC")
                .unwrap()
                .total_staked,
            Decimal::new(50, 0)
        );
    }

    #[test]
    fn admin_ops_require_owner() {
        let mut hub = make_hub();
        let stranger = Address::random();

        let err = hub
            .create_pools(stranger, "USDC", PoolSelection::all(), T0)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Unauthorized));

        let err = hub
            .add_token_mapping(stranger, "0xabc", "USDC")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Unauthorized));

        let err = hub.set_bridge_fee(stranger, "USDC", 500).unwrap_err();
        assert!(matches!(err, BridgeError::Unauthorized));
    }

    #[test]
    fn mapping_round_trip_emits_events() {
        let mut hub = make_hub();
        hub.add_token_mapping(owner(), "0xusdc", "USDC").unwrap();
        hub.remove_token_mapping(owner(), "0xusdc").unwrap();
        let err = hub.remove_token_mapping(owner(), "0xusdc").unwrap_err();
        assert!(matches!(err, BridgeError::UnknownAsset(_)));

        let names: Vec<_> = hub.events().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["MAPPING_ADDED", "MAPPING_REMOVED"]);
    }

    #[test]
    fn fee_quote_resolves_mapping() {
        let mut hub = make_hub();
        hub.add_token_mapping(owner(), "0xusdc", "USDC").unwrap();
        hub.set_bridge_fee(owner(), "USDC", 10_000).unwrap(); // 1%

        let quote = hub
            .get_bridge_fee_quote("0xusdc", Decimal::new(200, 0))
            .unwrap();
        assert_eq!(quote, Decimal::new(2, 0));
    }

    #[test]
    fn staking_requires_existing_pool() {
        let mut hub = make_hub();
        let err = hub
            .stake(
                StakePoolKind::Farm,
                Address::random(),
                "USDC",
                Decimal::ONE,
                T0,
            )
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownAsset(_)));
    }

    #[test]
    fn reentrant_call_rejected() {
        let mut hub = make_hub();
        hub.guard.enter().unwrap();

        let err = hub
            .deposit_asset("USDC", Decimal::ONE, Address::random(), TARGET)
            .unwrap_err();
        assert!(matches!(err, BridgeError::ReentrantCall));
        assert!(hub.deposit_ledger().is_empty());

        // Once the outer operation finishes, the hub accepts calls again.
        hub.guard.exit();
        hub.deposit_asset("USDC", Decimal::ONE, Address::random(), TARGET)
            .unwrap();
    }

    #[test]
    fn failed_operation_releases_the_guard() {
        let mut hub = make_hub();
        let err = hub
            .deposit_asset("USDC", Decimal::ZERO, Address::random(), TARGET)
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
        // The guard is open again after the failure.
        hub.deposit_asset("USDC", Decimal::ONE, Address::random(), TARGET)
            .unwrap();
    }
}
