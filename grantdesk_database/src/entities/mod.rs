pub mod permission;
pub mod role;
pub mod role_permission;

pub use permission::Query as PermissionQuery;
pub use role::Query as RoleQuery;
pub use role_permission::Mutation as RolePermissionMutation;
pub use role_permission::Query as RolePermissionQuery;
