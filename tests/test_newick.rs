mod common;

use acgtree::model::{ConversionSet, TimeTree, same_shape};
use acgtree::newick::{
    NewickParser, NewickStyle, parse_file, parse_str, to_newick, write_newick_file,
};
use acgtree::parser::byte_parser::ByteParser;
use acgtree::parser::ParsingErrorType;
use acgtree::marginal::MarginalTreeBuilder;
use acgtree::model::Block;
use std::fs::File;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_clonal_frame() {
    let frame = parse_str("((A:1.0,B:2.0):3.0,C:4.0):0.5;").unwrap();

    assert_eq!(frame.num_leaves(), 3);
    assert_eq!(frame.num_internal(), 2);
    assert_eq!(frame.labels().num_labels(), 3);

    // Deepest leaf B is at height 0
    let (a, b, c) = (
        frame.leaf_id("A").unwrap(),
        frame.leaf_id("B").unwrap(),
        frame.leaf_id("C").unwrap(),
    );
    assert_eq!(frame[b].height(), 0.0);
    assert_eq!(frame[a].height(), 1.0);
    assert_eq!(frame[c].height(), 1.0);
    assert_eq!(frame.tree_height(), 5.0);

    let (left, right) = frame.root().children().unwrap();
    assert_eq!(right, c);
    assert_eq!(frame[left].children(), Some((a, b)));
    assert_eq!(frame[left].height(), 2.0);
}

#[test]
fn test_comments_whitespace_and_quotes() {
    let newick = "[tree 1]\n ( ( 'Little Spotted Kiwi' : 1 , [x] Tokoeka:1e0 ) : 0.5 ,\t'Haast''s Eagle':1.5 ) ;";
    let frame = parse_str(newick).unwrap();

    assert!(frame.labels().contains_label("Little Spotted Kiwi"));
    assert!(frame.labels().contains_label("Tokoeka"));
    assert!(frame.labels().contains_label("Haast's Eagle"));
    assert_eq!(frame.tree_height(), 1.5);
}

#[test]
fn test_missing_branch_length() {
    let err = parse_str("((A:1,B):1,C:2);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::MissingBranchLength);
}

#[test]
fn test_invalid_newick_strings() {
    for newick in [
        "((A:1,B:1):1,C:2)",
        "((A:1,B:1,D:1):1,C:2);",
        "((A:1,B:-1):1,C:2);",
        "(A:x,B:1);",
        "(:1,B:1);",
    ] {
        assert!(parse_str(newick).is_err(), "accepted {newick}");
    }

    let err = parse_str("((A:1,B:1):1,C:2);(D:1,E:1);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));

    let err = parse_str("((A:1,B:1):1,C:2").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
}

#[test]
fn test_zero_branch_length_is_invalid_frame() {
    let err = parse_str("((A:0,B:0):1,C:1);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidTreeStructure(_)));
}

#[test]
fn test_duplicate_labels() {
    let err = parse_str("((A:1,B:1):1,A:2);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidTreeStructure(_)));
}

#[test]
fn test_single_leaf() {
    let frame = parse_str("Solo;").unwrap();
    assert_eq!(frame.num_vertices(), 1);
    assert_eq!(frame.tree_height(), 0.0);
}

#[test]
fn test_parse_all() {
    let input = "((A:1,B:1):1,C:2);\n[second]\n((A:0.5,C:0.5):1,B:1.5);\n";
    let mut parser = NewickParser::new().with_num_leaves(3);
    let frames = parser.parse_all(ByteParser::for_str(input)).unwrap();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].tree_height(), 2.0);
    assert_eq!(frames[1].tree_height(), 1.5);
}

// --- TESTS NEWICK WRITING ---
#[test]
fn test_write_read_round_trip() {
    let newick = "(((A:0.25,B:0.25):0.5,C:0.75):1,(D:1.5,E:1.5):0.25);";
    let frame = parse_str(newick).unwrap();
    let written = to_newick(NewickStyle::Label, &frame, Some(frame.labels()));
    assert_eq!(written, newick);

    let reparsed = parse_str(&written).unwrap();
    assert!(same_shape(&frame, &reparsed));
}

#[test]
fn test_write_styles() {
    let frame = common::three_taxa_frame();
    assert_eq!(to_newick(NewickStyle::ZeroIndexed, &frame, None), "((0:1,1:1):1,2:2);");
    assert_eq!(to_newick(NewickStyle::OneIndexed, &frame, None), "((1:1,2:1):1,3:2);");
    assert_eq!(to_newick(NewickStyle::Label, &frame, None), "");
}

#[test]
fn test_write_escapes_labels() {
    let frame = parse_str("('Haast''s Eagle':1,'Kea (alpine)':1);").unwrap();
    let written = to_newick(NewickStyle::Label, &frame, Some(frame.labels()));
    assert_eq!(written, "('Haast''s Eagle':1,'Kea (alpine)':1);");
}

#[test]
fn test_labels_with_spaces_and_underscores_stay_distinct() {
    let frame = parse_str("('Blue duck':1,Blue_duck:1);").unwrap();
    assert!(frame.labels().contains_label("Blue duck"));
    assert!(frame.labels().contains_label("Blue_duck"));

    let written = to_newick(NewickStyle::Label, &frame, Some(frame.labels()));
    assert_eq!(written, "('Blue duck':1,Blue_duck:1);");

    let reparsed = parse_str(&written).unwrap();
    assert_eq!(reparsed.leaf_id("Blue duck"), frame.leaf_id("Blue duck"));
    assert_eq!(reparsed.leaf_id("Blue_duck"), frame.leaf_id("Blue_duck"));
}

#[test]
fn test_write_and_parse_file() {
    let frame = common::three_taxa_frame();
    let mut conversions = ConversionSet::new();
    conversions.add(2, 0, 0.5, [1]);

    let builder = MarginalTreeBuilder::new(&frame, &conversions);
    let trees: Vec<_> = [Block::new(0), Block::new(1)]
        .iter()
        .map(|block| builder.build(block).unwrap())
        .collect();

    let file_name = format!("acgtree_marginal_trees_{}.nwk", std::process::id());
    let path = std::env::temp_dir().join(file_name);
    let file = File::create(&path).unwrap();
    write_newick_file(file, &trees, NewickStyle::Label, Some(frame.labels())).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "((A:1,B:1):1,C:2);\n((A:0.5,C:0.5):0.5,B:1);\n");

    let frames = parse_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(frames.len(), 2);
    assert!(same_shape(&frames[0], &frame));
    assert_eq!(frames[1].tree_height(), 1.0);
}

#[test]
fn test_parse_missing_file() {
    let err = parse_file("does/not/exist.nwk").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}
