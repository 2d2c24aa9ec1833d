use rstest::rstest;

use super::*;

#[rstest]
#[case(TypeTag::Any, TypeTag::Str, true)]
#[case(TypeTag::Any, TypeTag::Nil, true)]
#[case(TypeTag::Str, TypeTag::Str, true)]
#[case(TypeTag::Str, TypeTag::Int, false)]
#[case(TypeTag::Int, TypeTag::Any, false)]
fn type_tag_accepts(#[case] slot: TypeTag, #[case] value: TypeTag, #[case] expected: bool) {
	assert_eq!(slot.accepts(value), expected);
}

#[test]
fn value_type_tags() {
	assert_eq!(Value::Nil.type_tag(), TypeTag::Nil);
	assert_eq!(Value::from(true).type_tag(), TypeTag::Bool);
	assert_eq!(Value::from(3).type_tag(), TypeTag::Int);
	assert_eq!(Value::from("Foo").type_tag(), TypeTag::Str);
}

#[test]
fn value_display_is_bare_payload() {
	assert_eq!(Value::from("Foo").to_string(), "Foo");
	assert_eq!(Value::from(-7).to_string(), "-7");
	assert_eq!(Value::Nil.to_string(), "nil");
}

#[test]
fn method_type_display() {
	let ty = MethodType::new(TypeTag::Str, [TypeTag::Int, TypeTag::Int]);
	assert_eq!(ty.to_string(), "(int,int)str");
	assert_eq!(MethodType::nullary(TypeTag::Any).to_string(), "()any");
}

#[test]
fn insert_and_drop_params() {
	let base = MethodType::new(TypeTag::Any, [TypeTag::Int]);
	let widened = base.insert_params(0, [TypeTag::Str, TypeTag::Bool]);
	assert_eq!(widened.params(), &[TypeTag::Str, TypeTag::Bool, TypeTag::Int]);

	let narrowed = widened.drop_params(0, 2);
	assert_eq!(narrowed, base);

	// Out-of-range positions clamp instead of panicking.
	assert_eq!(base.insert_params(9, [TypeTag::Nil]).params(), &[TypeTag::Int, TypeTag::Nil]);
	assert_eq!(base.drop_params(5, 3), base);
}

#[test]
fn accepts_requires_exact_params_and_covariant_return() {
	let declared = MethodType::new(TypeTag::Any, [TypeTag::Int]);
	assert!(declared.accepts(&declared.change_return(TypeTag::Str)));
	assert!(!declared.change_return(TypeTag::Str).accepts(&declared));
	assert!(!declared.accepts(&MethodType::new(TypeTag::Any, [TypeTag::Str])));
	assert!(!declared.accepts(&MethodType::nullary(TypeTag::Any)));
}

#[test]
fn check_args_reports_arity_then_type() {
	let ty = MethodType::new(TypeTag::Str, [TypeTag::Int, TypeTag::Str]);
	assert_eq!(ty.check_args(&[Value::from(1), Value::from("x")]), Ok(()));
	assert_eq!(
		ty.check_args(&[Value::from(1)]),
		Err(ArgumentError::Arity {
			expected: 2,
			found: 1
		})
	);
	assert_eq!(
		ty.check_args(&[Value::from(1), Value::from(2)]),
		Err(ArgumentError::Type {
			index: 1,
			expected: TypeTag::Str,
			found: TypeTag::Int
		})
	);
}
