mod common;

use common::{init_logging, normalize};
use dancing_cover::LinkMatrix;
use std::ops::ControlFlow;

const UNIVERSE: [i32; 7] = [1, 2, 3, 4, 5, 6, 7];

// Figure 3 of Knuth's "Dancing Links" paper.
fn knuth_figure_3() -> LinkMatrix<i32, Vec<i32>> {
    LinkMatrix::from_sets_with_universe(
        vec![
            vec![3, 5, 6],
            vec![1, 4, 7],
            vec![2, 3, 6],
            vec![1, 4],
            vec![2, 7],
            vec![4, 5, 7],
        ],
        UNIVERSE,
    )
}

fn assert_figure_3_structure(matrix: &LinkMatrix<i32, Vec<i32>>) {
    let columns: Vec<_> = matrix.columns().collect();

    assert_eq!(columns.len(), 7);
    assert_eq!(
        columns.iter().map(|column| *column.id()).collect::<Vec<_>>(),
        UNIVERSE
    );

    assert_ne!(columns[0].down(), columns[0]);
    assert_ne!(columns[0].up(), columns[0]);
    assert_eq!(columns[0].nodes().count(), 2);
    assert_eq!(columns[0].up().up(), columns[0].down());
    assert_eq!(columns[0].up(), columns[0].down().down());

    assert_eq!(columns[0].down().right().up(), columns[3]);
    assert_eq!(columns[3].down().left().up(), columns[0]);
    assert_eq!(columns[0].down().down().right().up().up(), columns[3]);
    assert_eq!(
        columns[0].down().down().right().right().right().down().down(),
        columns[3]
    );
    assert_eq!(columns[2].up().right().down(), columns[5]);
    assert_eq!(
        columns[6]
            .down()
            .down()
            .down()
            .left()
            .up()
            .left()
            .down()
            .left()
            .down()
            .down(),
        columns[1]
    );

    for column in &columns {
        for node in column.nodes() {
            assert_eq!(node.column(), Some(*column));
        }
    }

    assert_eq!(matrix.verify(), Ok(()));
}

#[test]
fn new_matrix_is_empty() {
    let matrix = LinkMatrix::<i32, Vec<i32>>::new();

    assert_eq!(matrix.columns().count(), 0);
    assert!(matrix.is_empty());
}

#[test]
fn duplicate_column_ids_are_filtered() {
    let matrix = LinkMatrix::from_sets(vec![vec![1, 2, 2]]);

    assert_eq!(matrix.row(&[1, 2, 2][..]).unwrap().nodes().count(), 2);
}

#[test]
fn find_exact_cover() {
    let mut matrix = LinkMatrix::from_sets(vec![vec![1, 2], vec![2, 3], vec![3, 4]]);
    let mut cover = matrix.find_exact_cover().unwrap();
    cover.sort();

    assert_eq!(cover, vec![vec![1, 2], vec![3, 4]]);
}

#[test]
fn find_exact_cover_none() {
    let mut matrix = LinkMatrix::from_sets(vec![vec![1, 2], vec![2, 3]]);

    assert_eq!(matrix.find_exact_cover(), None);
}

#[test]
fn trivial_matrix_has_the_empty_cover() {
    let mut matrix = LinkMatrix::<i32, Vec<i32>>::new();

    assert_eq!(matrix.find_exact_cover(), Some(vec![]));
    assert_eq!(matrix.exact_covers().collect::<Vec<_>>(), vec![Vec::<Vec<i32>>::new()]);

    let mut yielded = Vec::new();
    matrix.each_exact_cover(|cover| -> ControlFlow<()> {
        yielded.push(cover.len());
        ControlFlow::Continue(())
    });
    assert_eq!(yielded, vec![0]);

    let mut yielded = Vec::new();
    matrix.each_exact_cover_recursive(|cover| -> ControlFlow<()> {
        yielded.push(cover.len());
        ControlFlow::Continue(())
    });
    assert_eq!(yielded, vec![0]);
}

#[test]
fn all_exact_covers() {
    init_logging();

    let mut matrix =
        LinkMatrix::from_sets(vec![vec![1, 2], vec![2, 3], vec![3, 4], vec![4, 1]]);

    assert_eq!(
        normalize(matrix.exact_covers().collect()),
        vec![
            vec![vec![1, 2], vec![3, 4]],
            vec![vec![2, 3], vec![4, 1]],
        ]
    );
}

#[test]
fn each_exact_cover_without_covers_never_calls_back() {
    let mut matrix = LinkMatrix::from_sets(vec![vec![1, 2], vec![2, 3]]);

    let stopped = matrix.each_exact_cover(|_| -> ControlFlow<()> {
        panic!("there is no exact cover to visit");
    });
    assert_eq!(stopped, None);
}

#[test]
fn recursive_search_with_shallow_final_depth() {
    let mut matrix = LinkMatrix::from_sets(vec![
        vec![1, 2],
        vec![2, 3],
        vec![3, 4],
        vec![4, 5],
        vec![1, 2, 3, 4, 5],
    ]);

    let mut covers = Vec::new();
    matrix.each_exact_cover_recursive(|cover| -> ControlFlow<()> {
        covers.push(cover.iter().map(|&row| row.clone()).collect::<Vec<_>>());
        ControlFlow::Continue(())
    });

    assert_eq!(covers, vec![vec![vec![1, 2, 3, 4, 5]]]);
}

#[test]
fn keyed_rows_yield_keys() {
    let mut matrix = LinkMatrix::from_keyed_sets(vec![
        ('a', vec![1, 2]),
        ('b', vec![3, 4, 5]),
        ('c', vec![1, 3, 5]),
        ('d', vec![2, 4]),
    ]);

    let mut recursive = Vec::new();
    matrix.each_exact_cover_recursive(|cover| -> ControlFlow<()> {
        recursive.push(cover.iter().map(|&&key| key).collect::<Vec<_>>());
        ControlFlow::Continue(())
    });

    let mut iterative = Vec::new();
    matrix.each_exact_cover(|cover| -> ControlFlow<()> {
        iterative.push(cover.iter().map(|&&key| key).collect::<Vec<_>>());
        ControlFlow::Continue(())
    });

    assert_eq!(recursive, iterative);
    assert_eq!(normalize(recursive), vec![vec!['a', 'b'], vec!['c', 'd']]);
    assert_eq!(
        matrix.row(&'c').unwrap().columns().copied().collect::<Vec<_>>(),
        vec![1, 3, 5]
    );
}

#[test]
fn figure_3_structure() {
    assert_figure_3_structure(&knuth_figure_3());
}

#[test]
fn figure_3_exact_cover() {
    let mut matrix = knuth_figure_3();

    let cover = matrix.find_exact_cover().unwrap();
    assert_eq!(
        normalize(vec![cover]),
        vec![vec![vec![1, 4], vec![2, 7], vec![3, 5, 6]]]
    );

    assert_eq!(
        matrix.exact_covers().collect::<Vec<_>>(),
        vec![vec![vec![1, 4], vec![3, 5, 6], vec![2, 7]]]
    );
}

#[test]
fn figure_3_after_each_exact_cover() {
    let mut matrix = knuth_figure_3();
    matrix.each_exact_cover(|_| ControlFlow::<()>::Continue(()));

    assert_figure_3_structure(&matrix);
}

#[test]
fn figure_3_with_column_covered() {
    let mut matrix = knuth_figure_3();
    let before = matrix.topology();
    let fourth = matrix.column_id(&4).unwrap();

    matrix.cover(fourth);

    {
        let columns: Vec<_> = matrix.columns().collect();
        assert_eq!(columns.len(), 6);

        assert_eq!(
            UNIVERSE
                .iter()
                .map(|id| matrix.column(id).unwrap().size())
                .collect::<Vec<_>>(),
            vec![0, 2, 2, 3, 1, 2, 1]
        );
        assert_eq!(
            columns.iter().map(|column| column.size()).collect::<Vec<_>>(),
            vec![0, 2, 2, 1, 2, 1]
        );

        assert_eq!(columns[0].down(), columns[0]);
        assert_eq!(columns[0].up(), columns[0]);
        assert_eq!(columns[0].nodes().count(), 0);

        assert_eq!(columns[1].down().right().up().up(), columns[2]);
        assert_eq!(columns[2].down().right().up(), columns[3]);
        assert_eq!(columns[3].up().right().down().down(), columns[4]);
        assert_eq!(columns[5].down().right().down(), columns[1]);
        assert_eq!(
            columns[5]
                .up()
                .left()
                .up()
                .right()
                .up()
                .right()
                .right()
                .down()
                .down(),
            columns[4]
        );

        assert!(matrix.column(&4).unwrap().is_covered());
        assert_eq!(matrix.verify(), Ok(()));
    }

    matrix.uncover(fourth);

    assert_eq!(matrix.topology(), before);
    assert_figure_3_structure(&matrix);
}

#[test]
fn every_protocol_restores_the_matrix() {
    let mut matrix =
        LinkMatrix::from_sets(vec![vec![1, 2], vec![2, 3], vec![3, 4], vec![4, 1]]);
    let before = matrix.topology();

    matrix.find_exact_cover();
    assert_eq!(matrix.topology(), before);

    assert_eq!(matrix.exact_covers().count(), 2);
    assert_eq!(matrix.topology(), before);

    {
        let mut covers = matrix.exact_covers();
        assert!(covers.next().is_some());
    }
    assert_eq!(matrix.topology(), before);

    let first = matrix.each_exact_cover(|cover| ControlFlow::Break(cover.len()));
    assert_eq!(first, Some(2));
    assert_eq!(matrix.topology(), before);

    let first = matrix.each_exact_cover_recursive(|cover| ControlFlow::Break(cover.len()));
    assert_eq!(first, Some(2));
    assert_eq!(matrix.topology(), before);
}

#[test]
fn display_lists_uncovered_columns() {
    let mut matrix = knuth_figure_3();
    assert_eq!(matrix.to_string().lines().count(), 7);

    let first = matrix.column_id(&1).unwrap();
    matrix.cover(first);
    assert_eq!(matrix.to_string().lines().count(), 6);
    matrix.uncover(first);
}
