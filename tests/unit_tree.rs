mod unit_tree {

	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use pvtree::pv::{
		CountingMetrics, Field, MessageKind, MessageQueue, PostHandler, PvError, PvTree, QUEUE_METRICS_LABEL,
		ScalarArrayValue, ScalarKind, ScalarValue, TREE_METRICS_LABEL, TreeOptions, UnionDecl, UnionValue,
	};

	#[derive(Default)]
	struct CountingHandler {
		count: AtomicUsize,
	}

	impl CountingHandler {
		fn count(&self) -> usize {
			self.count.load(Ordering::SeqCst)
		}
	}

	impl PostHandler for CountingHandler {
		fn post_put(&self) {
			self.count.fetch_add(1, Ordering::SeqCst);
		}
	}

	fn nested_field() -> Arc<Field> {
		let inner = Field::structure(vec![("b", Field::scalar(ScalarKind::Int))]).expect("inner decl builds");
		Field::structure(vec![("a", inner)]).expect("outer decl builds")
	}

	#[test]
	fn full_names_join_ancestors_and_stop_at_the_root() {
		let tree = PvTree::new(nested_field()).expect("tree builds");
		let a = tree.lookup("a").expect("a resolves");
		let b = tree.lookup("a.b").expect("a.b resolves");

		assert_eq!(tree.full_name(tree.root()), "");
		assert_eq!(tree.full_name(a), "a");
		assert_eq!(tree.full_name(b), "a.b");
		assert_eq!(tree.node(b).name(), "b");
		assert_eq!(tree.node(b).parent(), Some(a));
	}

	#[test]
	fn lookup_misses_return_none() {
		let tree = PvTree::new(nested_field()).expect("tree builds");
		assert!(tree.lookup("").is_none());
		assert!(tree.lookup("a.missing").is_none());
		assert!(tree.lookup("a.b.too.deep").is_none());
	}

	#[test]
	fn post_handler_registration_is_idempotent_per_instance() {
		let mut tree = PvTree::new(nested_field()).expect("tree builds");
		let b = tree.lookup("a.b").expect("a.b resolves");

		let handler = Arc::new(CountingHandler::default());
		tree.register_post_handler(b, handler.clone()).expect("first registration");
		tree.register_post_handler(b, handler.clone()).expect("same handler again");

		let err = tree
			.register_post_handler(b, Arc::new(CountingHandler::default()))
			.expect_err("different handler rejected");
		assert!(matches!(err, PvError::HandlerAlreadyRegistered { name } if name == "a.b"));

		tree.set_scalar(b, ScalarValue::Int(5)).expect("scalar sets");
		assert_eq!(handler.count(), 1);
	}

	#[test]
	fn sealing_a_structure_seals_its_descendants() {
		let mut tree = PvTree::new(nested_field()).expect("tree builds");
		let a = tree.lookup("a").expect("a resolves");
		let b = tree.lookup("a.b").expect("a.b resolves");

		tree.set_immutable(a);
		tree.set_immutable(a);
		assert!(tree.node(a).is_immutable());
		assert!(tree.node(b).is_immutable());
		assert!(!tree.node(tree.root()).is_immutable());

		let err = tree.set_scalar(b, ScalarValue::Int(1)).expect_err("descendant sealed");
		assert!(matches!(err, PvError::ImmutableField { name } if name == "a.b"));
	}

	#[test]
	fn scalar_array_roundtrip_and_kind_enforcement() {
		let field = Field::structure(vec![("values", Field::scalar_array(ScalarKind::Double))]).expect("decl builds");
		let mut tree = PvTree::new(field).expect("tree builds");
		let values = tree.lookup("values").expect("values resolves");

		tree.set_scalar_array(values, ScalarArrayValue::Double(vec![1.0, 2.5]))
			.expect("array sets");
		assert_eq!(
			tree.scalar_array(values).expect("array reads"),
			&ScalarArrayValue::Double(vec![1.0, 2.5])
		);

		let err = tree
			.set_scalar_array(values, ScalarArrayValue::Int(vec![1]))
			.expect_err("element kind differs");
		assert!(matches!(err, PvError::ScalarConversion { .. }));

		let err = tree.scalar(values).expect_err("not a scalar");
		assert!(matches!(err, PvError::TypeMismatch { .. }));
	}

	#[test]
	fn union_selection_enforces_the_member_range() {
		let field = Field::union_of(vec![
			("number", Field::scalar(ScalarKind::Int)),
			("text", Field::scalar(ScalarKind::String)),
		])
		.expect("union builds");
		let mut tree = PvTree::new(field).expect("tree builds");
		let root = tree.root();

		assert_eq!(tree.union_value(root).expect("union reads").selector(), None);

		tree.select_union(root, 0).expect("selection succeeds");
		assert_eq!(tree.union_value(root).expect("union reads").selector(), Some(0));

		let err = tree.select_union(root, 2).expect_err("member out of range");
		assert!(matches!(err, PvError::NoSuchMember { index: 2, count: 2 }));

		tree.clear_union(root).expect("clear succeeds");
		assert_eq!(tree.union_value(root).expect("union reads").selector(), None);
	}

	#[test]
	fn set_union_validates_the_member_tree_shape() {
		let field = Field::union_of(vec![
			("number", Field::scalar(ScalarKind::Int)),
			("text", Field::scalar(ScalarKind::String)),
		])
		.expect("union builds");
		let mut tree = PvTree::new(field).expect("tree builds");
		let root = tree.root();

		let mut number = PvTree::new(Field::scalar(ScalarKind::Int)).expect("member builds");
		let number_root = number.root();
		number.set_scalar(number_root, ScalarValue::Int(11)).expect("member sets");
		tree.set_union(root, 0, number).expect("matching member stores");

		let wrong = PvTree::new(Field::scalar(ScalarKind::Double)).expect("member builds");
		let err = tree.set_union(root, 1, wrong).expect_err("shape differs");
		assert!(matches!(err, PvError::DeclMismatch { .. }));
	}

	#[test]
	fn union_array_elements_are_validated_per_selector() {
		let decl = Arc::new(UnionDecl::new(vec![("number", Field::scalar(ScalarKind::Int))]).expect("union decl builds"));
		let mut tree = PvTree::new(Field::union_array(decl)).expect("tree builds");
		let root = tree.root();

		let member = PvTree::new(Field::scalar(ScalarKind::Int)).expect("member builds");
		tree.set_union_array(root, vec![UnionValue::unselected(), UnionValue::selected(0, member)])
			.expect("elements store");
		assert_eq!(tree.union_array(root).expect("array reads").len(), 2);

		let wrong = PvTree::new(Field::scalar(ScalarKind::String)).expect("member builds");
		let err = tree
			.set_union_array(root, vec![UnionValue::selected(0, wrong)])
			.expect_err("member shape differs");
		assert!(matches!(err, PvError::DeclMismatch { .. }));
	}

	#[test]
	fn construction_limits_are_enforced() {
		let mut field = Field::scalar(ScalarKind::Int);
		for _ in 0..70 {
			field = Field::structure(vec![("deeper", field)]).expect("decl builds");
		}
		let err = PvTree::new(field).expect_err("past the depth ceiling");
		assert!(matches!(err, PvError::DepthExceeded { max_depth: 64 }));

		let wide = Field::structure(vec![
			("a", Field::scalar(ScalarKind::Int)),
			("b", Field::scalar(ScalarKind::Int)),
			("c", Field::scalar(ScalarKind::Int)),
		])
		.expect("decl builds");
		let options = TreeOptions {
			max_nodes: 2,
			..TreeOptions::default()
		};
		let err = PvTree::with_options(wide, &options).expect_err("past the node budget");
		assert!(matches!(err, PvError::TooManyNodes { max_nodes: 2 }));
	}

	#[test]
	fn lifecycle_metrics_balance_out() {
		let metrics = Arc::new(CountingMetrics::new());

		{
			let options = TreeOptions::default();
			let first = PvTree::with_metrics(nested_field(), &options, metrics.clone()).expect("tree builds");
			let second = first.clone();
			assert_eq!(metrics.counts(TREE_METRICS_LABEL), (2, 0));
			drop(second);

			let queue = MessageQueue::with_metrics(4, metrics.clone());
			assert_eq!(metrics.counts(QUEUE_METRICS_LABEL), (1, 0));
			drop(queue);
		}

		assert_eq!(metrics.live(TREE_METRICS_LABEL), 0);
		assert_eq!(metrics.live(QUEUE_METRICS_LABEL), 0);
		assert_eq!(metrics.counts(TREE_METRICS_LABEL), (2, 2));
	}

	#[test]
	fn queue_reports_through_the_same_collector_api() {
		let mut queue = MessageQueue::new(1);
		assert!(queue.put("tree rebuilt", MessageKind::Info, false));
		assert!(!queue.put("dropped", MessageKind::Warning, false));
		assert_eq!(queue.capacity(), 1);
		assert_eq!(queue.len(), 1);
		assert_eq!(queue.take().expect("queued message").kind, MessageKind::Info);
	}
}
