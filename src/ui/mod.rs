pub mod dispatcher;
pub mod highlight;
pub mod layout;
pub mod markup;
pub mod render;
pub mod surface;
