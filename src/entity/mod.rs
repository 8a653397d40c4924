pub mod cupones;
pub mod productos;

pub use cupones::Entity as Cupones;
pub use productos::Entity as Productos;
