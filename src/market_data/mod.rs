// Market data module entrypoint
pub mod adapters;       // event sources (recorded captures)
pub mod external_book;  // in-memory per-symbol books driven by the dispatcher
pub mod router;         // wires an adapter into the dispatcher
