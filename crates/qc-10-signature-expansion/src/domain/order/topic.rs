//! Consensus topic transactions.

use super::{OrderContext, SigRequirements};
use crate::domain::errors::KeyOrderingFailure;
use crate::domain::lookup::SigMetadataLookup;
use shared_types::{TopicCreateBody, TopicDeleteBody, TopicSubmitMessageBody, TopicUpdateBody};

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub(super) fn topic_create(
        &self,
        op: &TopicCreateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        ctx.push_optional(op.admin_key.as_ref());
        self.auto_renew_key(op.auto_renew_account.as_ref(), ctx)
    }

    pub(super) fn topic_update(
        &self,
        op: &TopicUpdateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self.lookup.topic_signing_meta_for(&op.topic, ctx.linked_refs)?;
        if op.only_extends_expiry() {
            return Ok(());
        }
        ctx.push_optional(target.admin_key.as_ref());
        ctx.push_optional(op.admin_key.as_ref());
        self.auto_renew_key(op.auto_renew_account.as_ref(), ctx)
    }

    pub(super) fn topic_delete(
        &self,
        op: &TopicDeleteBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self.lookup.topic_signing_meta_for(&op.topic, ctx.linked_refs)?;
        ctx.push_optional(target.admin_key.as_ref());
        Ok(())
    }

    pub(super) fn topic_submit(
        &self,
        op: &TopicSubmitMessageBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self.lookup.topic_signing_meta_for(&op.topic, ctx.linked_refs)?;
        ctx.push_optional(target.submit_key.as_ref());
        Ok(())
    }
}
