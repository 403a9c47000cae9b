//! Role names shared by the auth middleware and the `profiles` table.

/// Agency-side role: full access to every client, project, and invoice.
pub const ROLE_ADMIN: &str = "admin";

/// Client-side role: scoped to the client's own projects and invoices.
pub const ROLE_CLIENT: &str = "client";
