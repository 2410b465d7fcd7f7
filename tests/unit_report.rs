mod unit_report {

	use pvtree::pv::{Field, PvTree, ScalarArrayValue, ScalarKind, ScalarValue, TreeReport};

	fn sample_tree() -> PvTree {
		let inner = Field::structure(vec![("c", Field::scalar(ScalarKind::Int))]).expect("inner decl builds");
		let field = Field::structure(vec![
			("a", Field::scalar(ScalarKind::Double)),
			("b", inner),
			("values", Field::scalar_array(ScalarKind::Int)),
		])
		.expect("decl builds");
		PvTree::new(field).expect("tree builds")
	}

	#[test]
	fn report_mirrors_names_offsets_and_rendered_values() {
		let mut tree = sample_tree();
		let a = tree.lookup("a").expect("a resolves");
		let values = tree.lookup("values").expect("values resolves");
		tree.set_scalar(a, ScalarValue::Double(2.5)).expect("scalar sets");
		tree.set_scalar_array(values, ScalarArrayValue::Int(vec![1, 2, 3])).expect("array sets");

		let report = TreeReport::from_tree(&tree);
		assert_eq!(report.name, "");
		assert_eq!(report.offset, 0);
		assert_eq!(report.next_offset, 5);
		assert!(report.value.is_none());
		assert_eq!(report.children.len(), 3);

		assert_eq!(report.children[0].name, "a");
		assert_eq!(report.children[0].value.as_deref(), Some("2.5"));
		assert_eq!(report.children[1].children[0].name, "b.c");
		assert_eq!(report.children[2].value.as_deref(), Some("int[3]"));
	}

	#[test]
	fn report_serializes_with_camel_case_kinds() {
		let tree = sample_tree();
		let report = TreeReport::from_tree(&tree);
		let json = serde_json::to_value(&report).expect("report serializes");

		assert_eq!(json["kind"], "structure");
		assert_eq!(json["children"][0]["kind"], "scalar");
		assert_eq!(json["children"][2]["kind"], "scalarArray");
		assert_eq!(json["children"][1]["children"][0]["offset"], 3);
		assert_eq!(json["children"][1]["next_offset"], 4);
	}

	#[test]
	fn union_and_array_nodes_render_summaries() {
		let field = Field::structure(vec![(
			"choice",
			Field::union_of(vec![("i", Field::scalar(ScalarKind::Int))]).expect("union builds"),
		)])
		.expect("decl builds");
		let mut tree = PvTree::new(field).expect("tree builds");
		let choice = tree.lookup("choice").expect("choice resolves");

		let report = TreeReport::from_tree(&tree);
		assert_eq!(report.children[0].value.as_deref(), Some("unselected"));

		tree.select_union(choice, 0).expect("selection succeeds");
		let report = TreeReport::from_tree(&tree);
		assert_eq!(report.children[0].value.as_deref(), Some("selected 0"));
	}
}
