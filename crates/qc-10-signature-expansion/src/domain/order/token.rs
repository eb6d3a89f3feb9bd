//! Token service transactions.

use super::{OrderContext, SigRequirements};
use crate::domain::errors::KeyOrderingFailure;
use crate::domain::lookup::{SigMetadataLookup, TokenSigningMetadata};
use shared_types::{
    AccountRef, Key, TokenCreateBody, TokenManageBody, TokenOperation, TokenUpdateBody,
};

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub(super) fn token_create(
        &self,
        op: &TokenCreateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        self.treasury_key(&op.treasury, ctx)?;
        ctx.push_optional(op.admin_key.as_ref());
        self.auto_renew_key(op.auto_renew_account.as_ref(), ctx)
    }

    pub(super) fn token_update(
        &self,
        op: &TokenUpdateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let token = self.lookup.token_signing_meta_for(&op.token, ctx.linked_refs)?;
        ctx.push_optional(token.admin_key.as_ref());
        if let Some(treasury) = &op.treasury {
            self.treasury_key(treasury, ctx)?;
        }
        ctx.push_optional(op.admin_key.as_ref());
        self.auto_renew_key(op.auto_renew_account.as_ref(), ctx)
    }

    /// Operations authorized by a single role key of the token.
    pub(super) fn token_manage(
        &self,
        op: &TokenManageBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let token = self.lookup.token_signing_meta_for(&op.token, ctx.linked_refs)?;
        ctx.push_optional(role_key(&token, op.operation));
        Ok(())
    }

    fn treasury_key(
        &self,
        treasury: &AccountRef,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if ctx.is_payer(treasury) {
            return Ok(());
        }
        let meta = self
            .lookup
            .account_signing_meta_for(treasury, ctx.linked_refs)
            .map_err(|_| KeyOrderingFailure::MissingTokenTreasury)?;
        ctx.push(meta.key);
        Ok(())
    }
}

fn role_key(token: &TokenSigningMetadata, operation: TokenOperation) -> Option<&Key> {
    match operation {
        TokenOperation::Mint | TokenOperation::Burn => token.supply_key.as_ref(),
        TokenOperation::Wipe => token.wipe_key.as_ref(),
        TokenOperation::Freeze | TokenOperation::Unfreeze => token.freeze_key.as_ref(),
        TokenOperation::GrantKyc | TokenOperation::RevokeKyc => token.kyc_key.as_ref(),
        TokenOperation::Delete => token.admin_key.as_ref(),
        TokenOperation::Pause | TokenOperation::Unpause => token.pause_key.as_ref(),
        TokenOperation::FeeScheduleUpdate => token.fee_schedule_key.as_ref(),
    }
}
