use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::operation::{AccessKind, MemoryOperation};
use crate::trace::TraceSchema;

/// Generates a reproducible stream of operations with some locality, roughly a program walking a
/// few arrays with strided loads, storing into some of them, plus scattered accesses
///
/// # Arguments
///
/// * `count`: Number of operations
/// * `seed`: Seed for the generator, the same seed gives the same stream
///
/// returns: Vec<MemoryOperation>
pub fn synthetic_operations(count: usize, seed: u64) -> Vec<MemoryOperation> {
    const ARRAYS: [u64; 4] = [0x1000_0000, 0x2000_4000, 0x3000_8040, 0x7fff_f000];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cursors = [0u64; ARRAYS.len()];
    (0..count)
        .map(|_| {
            let kind = if rng.gen_bool(0.3) { AccessKind::Store } else { AccessKind::Load };
            let address = if rng.gen_bool(0.85) {
                let array = rng.gen_range(0..ARRAYS.len());
                cursors[array] = (cursors[array] + 8) % (64 * 1024);
                ARRAYS[array] + cursors[array]
            } else {
                rng.gen_range(0..1u64 << 32)
            };
            MemoryOperation { kind, address }
        })
        .collect()
}

/// Renders operations as trace text laid out according to `schema`. Columns the schema doesn't
/// use are filled with `-`
pub fn render_trace(operations: &[MemoryOperation], schema: &TraceSchema) -> String {
    let width = schema.kind_column.max(schema.address_column) + 1;
    let mut out = String::new();
    for operation in operations {
        let mut columns = vec![String::from("-"); width];
        columns[schema.kind_column] = match operation.kind {
            AccessKind::Load => schema.load_token.clone(),
            AccessKind::Store => schema.store_token.clone(),
        };
        columns[schema.address_column] = format!("{:#x}", operation.address);
        out.push_str(&columns.join(" "));
        out.push('\n');
    }
    out
}
