use std::{fs, num::NonZeroUsize, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use wallet_harness_config::{Address, HarnessConfig};
use wallet_harness_core::{
    rpc::SendArgs,
    scenario::{DynError, Expectation, RunContext, Workload as ScenarioWorkload},
    tools::import_generated_key,
};

use crate::{
    expectations::{AccountBalanceExpectation, FaucetSequenceExpectation},
    ledger::{CreatedAccount, TransferLedger},
};

/// A fresh account's first outbound transaction always carries sequence 1.
const FIRST_OUTBOUND_SEQUENCE: u64 = 1;

/// The faucet round-trip batch: generate a keystore entry, fund it from the
/// faucet, unlock it, send a portion back, and confirm the balance.
pub struct BatchTransferWorkload {
    iterations: NonZeroUsize,
    password: Option<String>,
    ledger: Arc<TransferLedger>,
}

#[async_trait]
impl ScenarioWorkload for BatchTransferWorkload {
    fn name(&self) -> &'static str {
        "batch_transfer"
    }

    fn expectations(&self) -> Vec<Box<dyn Expectation>> {
        vec![
            Box::new(FaucetSequenceExpectation::new(Arc::clone(&self.ledger))),
            Box::new(AccountBalanceExpectation::new(Arc::clone(&self.ledger))),
        ]
    }

    fn init(&mut self, config: &HarnessConfig) -> Result<(), DynError> {
        let path = &config.homes.password_file;
        let raw = fs::read_to_string(path).map_err(|err| {
            format!(
                "could not read account password file {}: {err}",
                path.display()
            )
        })?;

        let password = raw.trim_end_matches(['\n', '\r']).to_owned();
        if password.is_empty() {
            return Err(format!("account password file {} is empty", path.display()).into());
        }

        info!(
            iterations = self.iterations.get(),
            password_file = %path.display(),
            "batch transfer workload initialized"
        );
        self.password = Some(password);
        Ok(())
    }

    async fn start(&self, ctx: &RunContext) -> Result<(), DynError> {
        let password = self
            .password
            .as_deref()
            .ok_or("batch transfer workload was not initialized")?;

        let mut sequence = self.prepare_faucet(ctx).await?;

        for round in 0..self.iterations.get() {
            info!(round, faucet_sequence = sequence, "starting transfer round");
            let address = self.run_round(ctx, password, sequence).await?;
            sequence += 1;
            self.ledger.record_completed(CreatedAccount { address });
        }

        info!(
            completed = self.ledger.completed_count(),
            "batch transfers finished"
        );
        Ok(())
    }
}

impl BatchTransferWorkload {
    #[must_use]
    pub fn new(iterations: NonZeroUsize) -> Self {
        Self {
            iterations,
            password: None,
            ledger: Arc::new(TransferLedger::new()),
        }
    }

    #[must_use]
    pub const fn iterations(&self) -> NonZeroUsize {
        self.iterations
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<TransferLedger> {
        Arc::clone(&self.ledger)
    }

    /// Record the faucet's current sequence, unlock it, and return the
    /// sequence the first funding transfer must carry.
    async fn prepare_faucet(&self, ctx: &RunContext) -> Result<u64, DynError> {
        let faucet = &ctx.config().faucet;

        let status = ctx.wallet_cli().query_account(&faucet.address).await?;
        self.ledger.record_base_sequence(status.sequence);

        info!(
            faucet = %faucet.address,
            sequence = status.sequence,
            "unlocking faucet"
        );
        let unlock = ctx
            .wallet_rpc()
            .unlock_key(&faucet.address, &faucet.password)
            .await?;
        if !unlock.unlocked {
            warn!(faucet = %faucet.address, "daemon reports faucet still locked");
        }

        Ok(status.sequence + 1)
    }

    /// One full round; returns the address of the account it created.
    async fn run_round(
        &self,
        ctx: &RunContext,
        password: &str,
        faucet_sequence: u64,
    ) -> Result<Address, DynError> {
        let config = ctx.config();
        let faucet = &config.faucet;
        let plan = &config.transfer;

        let address = ctx.keygen().generate_account().await?;
        let key_file = import_generated_key(&config.homes, &address)?;
        debug!(account = %address, key_file = %key_file.display(), "keystore entry imported");

        info!(account = %address, "funding from faucet");
        let funding = SendArgs::transfer(
            &config.chain_id,
            faucet.address,
            address,
            plan.funding_thetawei,
            plan.funding_tfuelwei,
            plan.fee_tfuelwei,
            faucet_sequence,
        );
        ctx.wallet_rpc().send(&funding).await?;

        let unlock = ctx.wallet_rpc().unlock_key(&address, password).await?;
        if !unlock.unlocked {
            warn!(account = %address, "daemon reports fresh account still locked");
        }

        info!(account = %address, "returning a portion to the faucet");
        let returning = SendArgs::transfer(
            &config.chain_id,
            address,
            faucet.address,
            plan.return_thetawei,
            plan.return_tfuelwei,
            plan.fee_tfuelwei,
            FIRST_OUTBOUND_SEQUENCE,
        );
        ctx.wallet_rpc().send(&returning).await?;

        let status = ctx.wallet_cli().query_account(&address).await?;
        info!(
            account = %address,
            thetawei = status.coins.thetawei,
            tfuelwei = status.coins.tfuelwei,
            sequence = status.sequence,
            "transfer round complete"
        );

        Ok(address)
    }
}
