// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities tell a client which actions to offer. They are advisory only
//! and do not replace the authorization checks in the handlers.

use hinanjo_domain::Role;
use hinanjo_persistence::AccountData;

use crate::auth::AuthenticatedActor;
use crate::request_response::{AdminCapabilities, Capability, GlobalCapabilities};

/// Computes global capabilities for an authenticated account.
#[must_use]
pub const fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    let admin: Capability = Capability::from_bool(actor.is_admin());
    GlobalCapabilities {
        can_manage_shelters: admin,
        can_import_shelters: admin,
        can_manage_stock: admin,
        can_manage_categories: admin,
        can_manage_admins: admin,
    }
}

/// Computes what `actor` may do to the administrator `target`.
///
/// `admin_count` is the number of administrators currently stored. The last
/// remaining administrator can never be demoted, not even by themselves.
#[must_use]
pub fn compute_admin_capabilities(
    actor: &AuthenticatedActor,
    target: &AccountData,
    admin_count: i64,
) -> AdminCapabilities {
    if !actor.is_admin() {
        return AdminCapabilities {
            can_edit: Capability::Denied,
            can_demote: Capability::Denied,
        };
    }

    let is_last_admin: bool = target.role == Role::Admin && admin_count <= 1;

    AdminCapabilities {
        can_edit: Capability::Allowed,
        can_demote: Capability::from_bool(target.role == Role::Admin && !is_last_admin),
    }
}
