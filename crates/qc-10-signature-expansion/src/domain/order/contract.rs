//! Smart contract transactions.

use super::{OrderContext, SigRequirements};
use crate::domain::errors::KeyOrderingFailure;
use crate::domain::lookup::{ContractSigningMetadata, SigMetadataLookup};
use shared_types::{
    ContractCallBody, ContractCreateBody, ContractDeleteBody, ContractRef, ContractUpdateBody,
};

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub(super) fn contract_create(
        &self,
        op: &ContractCreateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        ctx.push_new_admin_key(op.admin_key.as_ref());
        self.auto_renew_key(op.auto_renew_account.as_ref(), ctx)
    }

    pub(super) fn contract_update(
        &self,
        op: &ContractUpdateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self.mutable_contract(&op.contract, ctx);
        if op.only_extends_expiry() {
            return target.map(|_| ()).or_else(|report| match report {
                KeyOrderingFailure::ImmutableContract => Ok(()),
                other => Err(other),
            });
        }

        let target = target?;
        ctx.push_optional(target.admin_key.as_ref());
        ctx.push_new_admin_key(op.admin_key.as_ref());
        self.auto_renew_key(op.auto_renew_account.as_ref(), ctx)
    }

    pub(super) fn contract_delete(
        &self,
        op: &ContractDeleteBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self.mutable_contract(&op.contract, ctx)?;
        ctx.push_optional(target.admin_key.as_ref());

        if let Some(account) = &op.transfer_account {
            self.receiver_key(account, ctx)?;
        }
        if let Some(contract) = &op.transfer_contract {
            let beneficiary = self
                .lookup
                .contract_signing_meta_for(contract, ctx.linked_refs)?;
            if beneficiary.receiver_sig_required {
                ctx.push_optional(beneficiary.admin_key.as_ref());
            }
        }
        Ok(())
    }

    /// Value sent to a receiver-sig-required contract needs its admin key.
    pub(super) fn contract_call(
        &self,
        op: &ContractCallBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if op.amount <= 0 {
            return Ok(());
        }
        let target = self
            .lookup
            .contract_signing_meta_for(&op.contract, ctx.linked_refs)?;
        if target.receiver_sig_required {
            ctx.push_optional(target.admin_key.as_ref());
        }
        Ok(())
    }

    fn mutable_contract(
        &self,
        contract: &ContractRef,
        ctx: &mut OrderContext<'_>,
    ) -> Result<ContractSigningMetadata, KeyOrderingFailure> {
        let meta = self
            .lookup
            .contract_signing_meta_for(contract, ctx.linked_refs)?;
        if meta.is_immutable() {
            return Err(KeyOrderingFailure::ImmutableContract);
        }
        Ok(meta)
    }
}
