#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        constructor:
        "class Base { init(value) { this.value = value; } } \
         class Derived < Base {} \
         print Derived(\"value\").value;"
        => OK "value"
    }

    tests! {
        inherit_from_function:
        "fun Foo() {} class Subclass < Foo {}"
        => ERR "[line 1:31] Runtime error: Superclass must be a class."
    }

    tests! {
        inherit_from_number:
        "var Foo = 123; class Bar < Foo {}"
        => ERR "[line 1:28] Runtime error: Superclass must be a class."
    }

    tests! {
        inherit_methods:
        "class Base { foo() { print \"foo\"; } bar() { print \"bar\"; } } \
         class Derived < Base {} \
         var d = Derived(); d.foo(); d.bar();"
        => OK "foo", "bar"
    }

    tests! {
        parenthesized_superclass:
        "class Foo {} class Bar < (Foo) {}"
        => ERR "[line 1:26] Error at '(': Expect superclass name."
    }

    tests! {
        set_fields_from_base_class:
        "class Base { init() { this.foo = 1; this.bar = 2; } showFields() { print this.foo; print this.bar; } } \
         class Derived < Base {} \
         var d = Derived(); d.showFields();"
        => OK "1", "2"
    }
}
