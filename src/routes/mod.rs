// Routing is split per resource; each router owns the full method set of its
// paths. Staff checks live inside the mutating handlers, mirroring how read
// and write share the same id-qualified path.
pub mod albums;
pub mod posts;
pub mod session;
