//! Schedule service transactions.

use super::{OrderContext, SigRequirements};
use crate::domain::errors::KeyOrderingFailure;
use crate::domain::lookup::SigMetadataLookup;
use shared_types::{ScheduleCreateBody, ScheduleDeleteBody, ScheduleSignBody};

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub(super) fn schedule_create(
        &self,
        op: &ScheduleCreateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        ctx.push_optional(op.admin_key.as_ref());
        Ok(())
    }

    /// Signing only requires that the schedule exists.
    pub(super) fn schedule_sign(
        &self,
        op: &ScheduleSignBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        self.lookup
            .schedule_signing_meta_for(&op.schedule, ctx.linked_refs)?;
        Ok(())
    }

    pub(super) fn schedule_delete(
        &self,
        op: &ScheduleDeleteBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self
            .lookup
            .schedule_signing_meta_for(&op.schedule, ctx.linked_refs)?;
        ctx.push_optional(target.admin_key.as_ref());
        Ok(())
    }
}
