//! Crypto transactions: account lifecycle, transfers and allowances.

use super::{OrderContext, SigRequirements};
use crate::domain::errors::KeyOrderingFailure;
use crate::domain::lookup::SigMetadataLookup;
use shared_types::{
    AccountAmount, CryptoApproveAllowanceBody, CryptoCreateBody, CryptoDeleteBody,
    CryptoTransferBody, CryptoUpdateBody, NftTransfer,
};

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub(super) fn crypto_create(
        &self,
        op: &CryptoCreateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if op.receiver_sig_required {
            ctx.push(op.key.clone());
        }
        Ok(())
    }

    pub(super) fn crypto_update(
        &self,
        op: &CryptoUpdateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        self.required_account_key(&op.account, ctx)?;
        ctx.push_optional(op.key.as_ref());
        Ok(())
    }

    pub(super) fn crypto_delete(
        &self,
        op: &CryptoDeleteBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        self.required_account_key(&op.account, ctx)?;
        self.receiver_key(&op.transfer_account, ctx)
    }

    /// Hbar adjustments first, then each token list in order.
    pub(super) fn crypto_transfer(
        &self,
        op: &CryptoTransferBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        for adjustment in &op.hbar_transfers {
            self.adjustment_key(adjustment, ctx)?;
        }

        for list in &op.token_transfers {
            self.lookup
                .token_signing_meta_for(&list.token, ctx.linked_refs)?;
            for adjustment in &list.transfers {
                self.adjustment_key(adjustment, ctx)?;
            }
            for nft in &list.nft_transfers {
                self.nft_transfer_keys(nft, ctx)?;
            }
        }
        Ok(())
    }

    /// Every explicit owner other than the payer grants from their own account.
    pub(super) fn crypto_approve(
        &self,
        op: &CryptoApproveAllowanceBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        for grant in &op.allowances {
            if let Some(owner) = &grant.owner {
                self.required_account_key(owner, ctx)?;
            }
        }
        Ok(())
    }

    fn adjustment_key(
        &self,
        adjustment: &AccountAmount,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if adjustment.is_debit() {
            // Approved debits are authorized by the spender, i.e. the payer.
            if adjustment.is_approval {
                return Ok(());
            }
            self.required_account_key(&adjustment.account, ctx)
        } else if adjustment.is_credit() {
            self.receiver_key(&adjustment.account, ctx)
        } else {
            Ok(())
        }
    }

    fn nft_transfer_keys(
        &self,
        nft: &NftTransfer,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if !nft.is_approval {
            self.required_account_key(&nft.sender, ctx)?;
        }
        self.receiver_key(&nft.receiver, ctx)
    }
}
