//! Batched `LOCK TABLE` planning.

use crate::toc::TocObject;

/// Default number of tables per `LOCK TABLE` statement
pub const DEFAULT_LOCK_BATCH_SIZE: usize = 100;

/// Comma-joined FQN lists of at most `batch_size` tables each, in input
/// order. A batch size of zero is treated as one.
pub fn generate_table_batches<T: TocObject>(tables: &[T], batch_size: usize) -> Vec<String> {
    tables
        .chunks(batch_size.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|table| table.fqn())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect()
}

pub fn lock_statements<T: TocObject>(tables: &[T], batch_size: usize) -> Vec<String> {
    generate_table_batches(tables, batch_size)
        .into_iter()
        .map(|batch| format!("LOCK TABLE {batch} IN ACCESS SHARE MODE"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::{Relation, Table, TableDefinition};

    fn tables(count: u32) -> Vec<Table> {
        (0..count)
            .map(|i| {
                Table::new(
                    Relation::new(2200, i, "public", format!("t{i}")),
                    TableDefinition::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_even_batches() {
        let batches = generate_table_batches(&tables(200), 100);
        assert_eq!(batches.len(), 2);
        assert!(batches[0].starts_with("public.t0, public.t1, "));
        assert!(batches[1].ends_with("public.t199"));
    }

    #[test]
    fn test_remainder_batch() {
        let batches = generate_table_batches(&tables(101), 50);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2], "public.t100");
    }

    #[test]
    fn test_zero_batch_size_and_empty_input() {
        assert_eq!(generate_table_batches(&tables(3), 0).len(), 3);
        assert!(generate_table_batches(&tables(0), 10).is_empty());
    }

    #[test]
    fn test_lock_statements() {
        assert_eq!(
            lock_statements(&tables(3), 2),
            [
                "LOCK TABLE public.t0, public.t1 IN ACCESS SHARE MODE",
                "LOCK TABLE public.t2 IN ACCESS SHARE MODE",
            ]
        );
    }
}
