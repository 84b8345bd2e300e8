/**
 * =================================================================
 * APARATO: FIELD STRATA AUDIT (L1-MATH-CERT)
 * RESPONSABILIDAD: Certificación isomórfica del motor modular Fp.
 * =================================================================
 */
 use prospector_core_math::prelude::*;
 use num_bigint::BigUint;
 use std::time::Instant;
 
 fn get_satoshi_prime_oracle() -> BigUint {
     BigUint::parse_bytes(b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F", 16).unwrap()
 }
 
 #[test]
 fn certify_field_modular_arithmetic_full_cycle() {
     println!("\n⚖️  [AUDIT]: Initiating Field Element Isomorphism...");
     let oracle_p = get_satoshi_prime_oracle();
     
     // 1. Validar Montgomery Roundtrip
     let original = FieldElement::from_u64(0x1337BEEFCAFEBABE);
     let recovered = original.to_montgomery_domain().from_montgomery_domain();
     assert_eq!(original, recovered, "L1_FIELD_FAULT: Montgomery symmetry broken.");
 
     // 2. Tortura de Multiplicación (REDC) contra Oráculo BigInt
     let a = FieldElement::from_u64(0xDEADBEEF);
     let b = FieldElement::from_u64(0xCAFEBABE);
     let result = a.multiply_modular(&b);
     
     let a_big = BigUint::from(0xDEADBEEFu64);
     let b_big = BigUint::from(0xCAFEBABEu64);
     let expected_big = (a_big * b_big) % &oracle_p;
     
     let result_bytes = result.internal_words_to_big_endian_bytes();
     assert_eq!(BigUint::from_bytes_be(&result_bytes), expected_big, "L1_FIELD_FAULT: Multiplication drift.");
 
     // 3. Certificación de Inversión por Lote (Montgomery Batch)
     let mut batch = vec![FieldElement::from_u64(2), FieldElement::from_u64(3), FieldElement::from_u64(4)];
     let mut results = vec![FieldElement::default(); 3];
     let mut scratch = vec![FieldElement::default(); 3];
     
     FieldElement::batch_invert_into(&batch, &mut results, &mut scratch).unwrap();
     
     for i in 0..3 {
         let identity = batch[i].multiply_modular(&results[i]);
         assert_eq!(identity, FieldElement::from_u64(1), "L1_FIELD_FAULT: Batch inversion failed.");
     }
     
     println!("   ✅ Field Strata: Multi-Engine Parity Certified.");
 }