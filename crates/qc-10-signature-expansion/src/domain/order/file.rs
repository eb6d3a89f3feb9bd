//! File service transactions. The WACL of a file controls every change to it.

use super::{OrderContext, SigRequirements};
use crate::domain::errors::KeyOrderingFailure;
use crate::domain::lookup::SigMetadataLookup;
use shared_types::{FileCreateBody, FileId, FileUpdateBody};

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub(super) fn file_create(
        &self,
        op: &FileCreateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        ctx.push(op.keys.clone());
        Ok(())
    }

    /// Append and delete both need the current WACL.
    pub(super) fn file_modify(
        &self,
        file: &FileId,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let target = self.lookup.file_signing_meta_for(file, ctx.linked_refs)?;
        ctx.push(target.wacl);
        Ok(())
    }

    pub(super) fn file_update(
        &self,
        op: &FileUpdateBody,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        self.file_modify(&op.file, ctx)?;
        ctx.push_optional(op.keys.as_ref());
        Ok(())
    }
}
