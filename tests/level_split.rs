use metareport_tools::tables::split_levels;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const TABLE: &str = "\
Level\tId\tName\tCount
1\t\tlvl1: Metabolism\t12
1\t\tlvl1: Genetic Information Processing\t4
2\t\tlvl2: Carbohydrate metabolism\t9
2\t\tlvl2: Translation\t4
3\t\tlvl3: Glycolysis\t9
3\t\tTranslation factors\t4
Function\tK00001\tK00001: alcohol dehydrogenase\t5
Function\tK02358\tK02358: elongation factor Tu\t4
";

fn names(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap().to_string())
        .collect()
}

#[test]
fn test_three_levels_and_functions_give_four_files() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("KEGG_counts.tsv");
    fs::write(&table, TABLE).unwrap();

    let prefix = dir.path().join("sample_KEGG");
    let split = split_levels(&table, &prefix).unwrap();
    assert_eq!(split.file_count(), 4);

    let written: BTreeSet<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("sample_KEGG"))
        .collect();
    let expected: BTreeSet<_> = [
        "sample_KEGG_level-1.tsv",
        "sample_KEGG_level-2.tsv",
        "sample_KEGG_level-3.tsv",
        "sample_KEGG_level-id.tsv",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(written, expected);
}

#[test]
fn test_level_names_cover_every_non_function_row() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("counts.tsv");
    fs::write(&table, TABLE).unwrap();
    let split = split_levels(&table, &dir.path().join("out")).unwrap();

    let from_levels: BTreeSet<String> = split.level_files.iter().flat_map(|p| names(p)).collect();
    let expected: BTreeSet<String> = [
        "Metabolism",
        "Genetic Information Processing",
        "Carbohydrate metabolism",
        "Translation",
        "Glycolysis",
        "Translation factors",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(from_levels, expected);

    let level_1 = fs::read_to_string(&split.level_files[0]).unwrap();
    assert_eq!(
        level_1,
        "Name\tCount\nMetabolism\t12\nGenetic Information Processing\t4\n"
    );
}

#[test]
fn test_function_rows_lose_ontology_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("counts.tsv");
    fs::write(&table, TABLE).unwrap();
    let split = split_levels(&table, &dir.path().join("out")).unwrap();

    let ids = fs::read_to_string(&split.id_file).unwrap();
    assert_eq!(
        ids,
        "Id\tName\tCount\nK00001\talcohol dehydrogenase\t5\nK02358\telongation factor Tu\t4\n"
    );
}
