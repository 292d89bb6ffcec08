use bitarray_codec::{build_table, decode, encode, BitArray, TableStrategy};
use proptest::prelude::*;

fn bit_array() -> impl Strategy<Value = BitArray> {
    prop::collection::vec(any::<bool>(), 0..300).prop_map(|bits| bits.into_iter().collect())
}

proptest! {
    #[test]
    fn test_binary_string_round_trip(s in "[01]{0,200}") {
        let ba: BitArray = s.parse().unwrap();
        prop_assert_eq!(ba.len(), s.len());
        prop_assert_eq!(ba.to_bin_string(), s);
    }

    #[test]
    fn test_byte_round_trip(ba in bit_array()) {
        let bytes = ba.to_bytes();
        prop_assert_eq!(bytes.len(), ba.len().div_ceil(8));
        prop_assert_eq!(BitArray::from_bytes(&bytes, Some(ba.len())), ba.clone());
        if ba.len() % 8 == 0 {
            prop_assert_eq!(BitArray::from_bytes(&bytes, None), ba);
        }
    }

    #[test]
    fn test_list_matches_bits(ba in bit_array()) {
        let list = ba.to_list();
        prop_assert_eq!(list.len(), ba.len());
        for (i, bit) in list.iter().enumerate() {
            prop_assert_eq!(*bit == 1, ba[i]);
        }
        prop_assert_eq!(ba.count(true), list.iter().filter(|&&b| b == 1).count());
    }

    #[test]
    fn test_slice_law(ba in bit_array(), a in 0..300usize, b in 0..300usize) {
        let (start, stop) = (a.min(b).min(ba.len()), a.max(b).min(ba.len()));
        let window = ba.slice(start as isize..stop as isize);
        prop_assert_eq!(window.len(), stop - start);
        for i in 0..window.len() {
            prop_assert_eq!(window[i], ba[start + i]);
        }
    }

    #[test]
    fn test_step_slice_visits_positions(ba in bit_array(), step in 1..10isize) {
        let forward = ba.slice_step(.., step).unwrap();
        let positions: Vec<usize> = (0..ba.len()).step_by(step as usize).collect();
        prop_assert_eq!(forward.len(), positions.len());
        for (k, &i) in positions.iter().enumerate() {
            prop_assert_eq!(forward[k], ba[i]);
        }
        let backward = ba.slice_step(.., -step).unwrap();
        let mut bits: Vec<bool> = forward.iter().collect();
        bits.reverse();
        let reversed: BitArray = bits.into_iter().collect();
        prop_assert_eq!(backward, reversed);
    }

    #[test]
    fn test_bitwise_laws(ba in bit_array()) {
        prop_assert_eq!(&ba & &ba, ba.clone());
        prop_assert_eq!(&ba | &ba, ba.clone());
        prop_assert_eq!(!!ba.clone(), ba.clone());
        let zero = &ba ^ &ba;
        prop_assert_eq!(zero.len(), ba.len());
        prop_assert!(!zero.any());
        let inverted = !&ba;
        prop_assert_eq!(inverted.count(true), ba.count(false));
    }

    #[test]
    fn test_mixed_length_bitwise(a in bit_array(), b in bit_array()) {
        prop_assert_eq!((&a & &b).len(), a.len().min(b.len()));
        prop_assert_eq!((&a | &b).len(), a.len().max(b.len()));
        let xor = &a ^ &b;
        prop_assert_eq!(xor.len(), a.len().max(b.len()));
        for i in 0..xor.len() {
            let lhs = i < a.len() && a[i];
            let rhs = i < b.len() && b[i];
            prop_assert_eq!(xor[i], lhs ^ rhs);
        }
    }

    #[test]
    fn test_concatenation_laws(a in bit_array(), b in bit_array()) {
        let joined = &a + &b;
        prop_assert_eq!(joined.len(), a.len() + b.len());
        prop_assert_eq!(joined.slice(..a.len() as isize), a.clone());
        prop_assert_eq!(joined.slice(a.len() as isize..), b);
    }

    #[test]
    fn test_splice_replaces_window(ba in bit_array(), value in bit_array(), a in 0..300usize, b in 0..300usize) {
        let (start, stop) = (a.min(b).min(ba.len()) as isize, a.max(b).min(ba.len()) as isize);
        let mut spliced = ba.clone();
        spliced.splice(start..stop, &value);
        let expected = ba.slice(..start) + value.clone() + ba.slice(stop..);
        prop_assert_eq!(spliced, expected);
    }

    #[test]
    fn test_codec_round_trip(text in "[a-h ]{0,200}", fixed in any::<bool>()) {
        let strategy = if fixed { TableStrategy::Fixed } else { TableStrategy::Hybrid };
        let table = build_table(&text, strategy);
        let bits = encode(&table, &text).unwrap();
        prop_assert_eq!(decode(&bits, &table).unwrap(), text);
    }
}
